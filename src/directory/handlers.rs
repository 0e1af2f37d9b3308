use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    AdminCreateCustomerRequest, CreateCustomerRequest, CreateEmployeeRequest, CreateUserRequest,
    CustomerPatch, EmployeeUpdated, LedgerView, Message, ProfileUpdate, UpdateEmployeeRequest,
    UpdateUserRequest,
};
use super::model::{Customer, CustomerAccount, Employee, EmployeeAccount, Role, User};
use super::services;
use crate::auth::extractors::Principal;
use crate::error::{AppError, AppResult};
use crate::extract::JsonBody;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/users/employees/available-users", get(employee_users))
        .route("/users/customers/available-users", get(available_customer_users))
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_own_customer))
        .route("/customers/profile", get(get_profile).put(update_profile))
        .route("/customers/me", get(my_ledger))
        .route("/customers/admin", post(admin_create_customer))
        .route("/customers/available-users", get(available_customer_users))
        .route(
            "/customers/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", put(update_employee).delete(delete_employee))
}

// users

#[instrument(skip(state, principal))]
pub async fn list_users(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<User>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.directory.list_users().await?))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn create_user(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    principal.require(&[Role::Admin])?;
    let user = services::create_user(&state, &body.email, &body.password, body.role).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, principal))]
pub async fn get_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<User>> {
    principal.require(&[Role::Admin])?;
    let user = state
        .directory
        .find_user(id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(user))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn update_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(services::update_user(&state, id, &body.email, body.role).await?))
}

#[instrument(skip(state, principal), fields(user_id = %principal.id()))]
pub async fn delete_user(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    principal.require(&[Role::Admin])?;
    if !state.directory.delete_user(id).await? {
        return Err(AppError::not_found("User"));
    }
    info!(deleted = %id, "user deleted");
    Ok(Json(Message {
        message: "User deleted",
    }))
}

#[instrument(skip(state, principal))]
pub async fn employee_users(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<User>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.directory.list_users_by_role(Role::Employee).await?))
}

/// Customer accounts that still lack a customer profile.
#[instrument(skip(state, principal))]
pub async fn available_customer_users(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<User>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.directory.unprofiled_customer_users().await?))
}

// customers

#[instrument(skip(state, principal))]
pub async fn get_profile(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Customer>> {
    let user = principal.require(&[Role::Customer])?;
    Ok(Json(services::own_customer(&state, user).await?))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<ProfileUpdate>,
) -> AppResult<Json<Message>> {
    let user = principal.require(&[Role::Customer])?;
    services::update_profile(&state, user, body).await?;
    Ok(Json(Message {
        message: "Profile updated",
    }))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn create_own_customer(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let user = principal.require(&[Role::Customer])?;
    let customer = services::create_customer(
        &state,
        user.id,
        &body.passport,
        body.contact_info,
        body.preferences,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

#[instrument(skip(state, principal))]
pub async fn my_ledger(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<LedgerView>> {
    let user = principal.require(&[Role::Customer])?;
    let customer = services::own_customer(&state, user).await?;
    Ok(Json(LedgerView {
        frequent_flyer: customer.frequent_flyer,
    }))
}

#[instrument(skip(state, principal))]
pub async fn list_customers(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<CustomerAccount>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.directory.list_customers().await?))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn admin_create_customer(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<AdminCreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    principal.require(&[Role::Admin])?;
    let customer = services::create_customer(
        &state,
        body.user,
        &body.passport,
        body.contact_info,
        body.preferences,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

#[instrument(skip(state, principal))]
pub async fn get_customer(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerAccount>> {
    principal.require(&[Role::Admin])?;
    let customer = state
        .directory
        .find_customer(id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer"))?;
    let email = state
        .directory
        .find_user(customer.user_id)
        .await?
        .map(|u| u.email)
        .unwrap_or_default();
    Ok(Json(CustomerAccount { customer, email }))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn update_customer(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<CustomerPatch>,
) -> AppResult<Json<Customer>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(services::patch_customer(&state, id, body).await?))
}

#[instrument(skip(state, principal), fields(user_id = %principal.id()))]
pub async fn delete_customer(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    principal.require(&[Role::Admin])?;
    if !state.directory.delete_customer(id).await? {
        return Err(AppError::not_found("Customer"));
    }
    info!(customer_id = %id, "customer deleted");
    Ok(Json(Message {
        message: "Customer deleted",
    }))
}

// employees

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn create_employee(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(body): JsonBody<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    principal.require(&[Role::Admin])?;
    let employee = services::create_employee(&state, body.user, body.role).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

#[instrument(skip(state, principal))]
pub async fn list_employees(
    State(state): State<AppState>,
    principal: Principal,
) -> AppResult<Json<Vec<EmployeeAccount>>> {
    principal.require(&[Role::Admin])?;
    Ok(Json(state.directory.list_employees().await?))
}

#[instrument(skip(state, principal, body), fields(user_id = %principal.id()))]
pub async fn update_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
    JsonBody(body): JsonBody<UpdateEmployeeRequest>,
) -> AppResult<Json<EmployeeUpdated>> {
    principal.require(&[Role::Admin])?;
    let employee = state
        .directory
        .update_employee_role(id, body.role)
        .await?
        .ok_or_else(|| AppError::not_found("Employee"))?;
    info!(employee_id = %id, role = ?body.role, "employee role changed");
    Ok(Json(EmployeeUpdated {
        message: "Employee updated",
        employee,
    }))
}

#[instrument(skip(state, principal), fields(user_id = %principal.id()))]
pub async fn delete_employee(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    principal.require(&[Role::Admin])?;
    if !state.directory.delete_employee(id).await? {
        return Err(AppError::not_found("Employee"));
    }
    info!(employee_id = %id, "employee deleted");
    Ok(Json(Message {
        message: "Employee deleted",
    }))
}
