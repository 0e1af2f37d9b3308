use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{CustomerPatch, ProfileUpdate};
use super::loyalty::FrequentFlyer;
use super::model::{ContactInfo, Customer, Employee, EmployeeRole, Preferences, Role, User};
use crate::auth::password::{hash_password, is_valid_email, normalize_email, MIN_PASSWORD_LEN};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Validates and stores a new account. Emails are normalised before the
/// uniqueness check.
#[instrument(skip(state, password))]
pub async fn create_user(
    state: &AppState,
    email: &str,
    password: &str,
    role: Role,
) -> AppResult<User> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if state.directory.find_user_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let user = User::new(email, hash_password(password)?, role);
    state.directory.insert_user(&user).await?;
    info!(user_id = %user.id, role = ?user.role, "user created");
    Ok(user)
}

pub async fn update_user(state: &AppState, id: Uuid, email: &str, role: Role) -> AppResult<User> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if let Some(other) = state.directory.find_user_by_email(&email).await? {
        if other.id != id {
            return Err(AppError::Conflict("Email already registered".into()));
        }
    }
    state
        .directory
        .update_user(id, &email, role)
        .await?
        .ok_or_else(|| AppError::not_found("User"))
}

/// Creates the customer profile of `user_id`; one profile per account.
#[instrument(skip(state, contact_info, preferences))]
pub async fn create_customer(
    state: &AppState,
    user_id: Uuid,
    passport: &str,
    contact_info: ContactInfo,
    preferences: Preferences,
) -> AppResult<Customer> {
    if passport.trim().is_empty() {
        return Err(AppError::Validation("passport is required".into()));
    }
    let user = state
        .directory
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    if user.role != Role::Customer {
        return Err(AppError::Validation("User is not a customer account".into()));
    }
    if state.directory.find_customer_by_user(user_id).await?.is_some() {
        return Err(AppError::Conflict("User already has a customer profile".into()));
    }

    let customer = Customer::new(user_id, passport.trim().to_string(), contact_info, preferences);
    state.directory.insert_customer(&customer).await?;
    info!(customer_id = %customer.id, %user_id, "customer created");
    Ok(customer)
}

pub async fn own_customer(state: &AppState, user: &User) -> AppResult<Customer> {
    state
        .directory
        .find_customer_by_user(user.id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))
}

/// Self-service edit of contact details and preferences.
pub async fn update_profile(
    state: &AppState,
    user: &User,
    update: ProfileUpdate,
) -> AppResult<Customer> {
    let mut customer = own_customer(state, user).await?;
    customer.contact_info = ContactInfo {
        phone: update.phone,
        address: update.address,
    };
    customer.preferences = Preferences {
        seat_preference: update.seat_preference,
        meal_preference: update.meal_preference,
    };
    state.directory.save_customer(&customer).await?;
    Ok(customer)
}

/// Admin edit; a points change recomputes the tier.
#[instrument(skip(state, patch))]
pub async fn patch_customer(
    state: &AppState,
    id: Uuid,
    patch: CustomerPatch,
) -> AppResult<Customer> {
    let mut customer = state
        .directory
        .find_customer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;
    if let Some(passport) = patch.passport {
        if passport.trim().is_empty() {
            return Err(AppError::Validation("passport is required".into()));
        }
        customer.passport = passport.trim().to_string();
    }
    if let Some(contact) = patch.contact_info {
        customer.contact_info = contact;
    }
    if let Some(prefs) = patch.preferences {
        customer.preferences = prefs;
    }
    if let Some(ff) = patch.frequent_flyer {
        customer.frequent_flyer = FrequentFlyer::with_points(ff.points);
    }
    state.directory.save_customer(&customer).await?;
    info!(customer_id = %id, tier = ?customer.frequent_flyer.status, "customer updated");
    Ok(customer)
}

/// Gives `user_id` an employee profile; one profile per account.
#[instrument(skip(state))]
pub async fn create_employee(
    state: &AppState,
    user_id: Uuid,
    role: EmployeeRole,
) -> AppResult<Employee> {
    let user = state
        .directory
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    if user.role != Role::Employee {
        return Err(AppError::Validation("User is not an employee account".into()));
    }
    if state.directory.find_employee_by_user(user_id).await?.is_some() {
        return Err(AppError::Conflict("User is already an employee".into()));
    }
    let employee = Employee::new(user_id, role);
    state.directory.insert_employee(&employee).await?;
    info!(employee_id = %employee.id, role = ?role, "employee created");
    Ok(employee)
}
