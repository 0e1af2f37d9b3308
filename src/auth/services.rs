use tracing::{info, instrument, warn};

use super::dto::{AuthResponse, PublicUser};
use super::jwt::JwtKeys;
use super::password::{is_valid_email, normalize_email, verify_password};
use super::verification::generate_code;
use crate::directory::model::{ContactInfo, Preferences, Role, User};
use crate::directory::services::{create_customer, create_user};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fresh access/refresh pair for `user`.
pub fn issue_tokens(keys: &JwtKeys, user: &User) -> AppResult<AuthResponse> {
    Ok(AuthResponse {
        token: keys.sign_access(user.id, user.role)?,
        refresh_token: keys.sign_refresh(user.id, user.role)?,
        user: PublicUser::from(user),
    })
}

/// Stores a new code for `email` and mails it.
#[instrument(skip(state))]
pub async fn send_code(state: &AppState, email: &str) -> AppResult<()> {
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    let code = generate_code();
    state.codes.put(&email, &code);
    state.notifier.verification_code(&email, &code).await?;
    info!(%email, "verification code sent");
    Ok(())
}

/// Open registration for employee and customer accounts.
pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    role: Option<Role>,
) -> AppResult<User> {
    let role = role.unwrap_or(Role::Customer);
    if role == Role::Admin {
        warn!(email, "admin self-registration refused");
        return Err(AppError::Forbidden("Admin accounts cannot self-register".into()));
    }
    create_user(state, email, password, role).await
}

/// Creates a customer account and its profile once the emailed code checks
/// out. The code is consumed on success.
#[instrument(skip(state, password, code))]
pub async fn register_customer(
    state: &AppState,
    email: &str,
    password: &str,
    passport: &str,
    code: &str,
) -> AppResult<User> {
    let email = normalize_email(email);
    if !state.codes.is_valid(&email, code.trim()) {
        return Err(AppError::Validation("Invalid or expired verification code".into()));
    }
    if passport.trim().is_empty() {
        return Err(AppError::Validation("passport is required".into()));
    }

    let user = create_user(state, &email, password, Role::Customer).await?;
    create_customer(
        state,
        user.id,
        passport,
        ContactInfo::default(),
        Preferences::default(),
    )
    .await?;
    state.codes.delete(&email);
    info!(user_id = %user.id, "customer registered");
    Ok(user)
}

/// Checks credentials; unknown email and wrong password look the same.
pub async fn login(state: &AppState, email: &str, password: &str) -> AppResult<User> {
    let email = normalize_email(email);
    let invalid = || AppError::Unauthorized("Invalid credentials".into());

    let Some(user) = state.directory.find_user_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(invalid());
    };
    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(invalid());
    }
    info!(user_id = %user.id, "user logged in");
    Ok(user)
}

/// Creates the admin account named by the environment if it is missing.
pub async fn ensure_admin(state: &AppState, email: &str, password: &str) -> AppResult<()> {
    if state
        .directory
        .find_user_by_email(&normalize_email(email))
        .await?
        .is_some()
    {
        return Ok(());
    }
    let admin = create_user(state, email, password, Role::Admin).await?;
    info!(user_id = %admin.id, "bootstrap admin created");
    Ok(())
}
