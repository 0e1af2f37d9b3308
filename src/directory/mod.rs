//! Accounts and the customer/employee profiles hanging off them.

mod dto;
pub mod handlers;
pub mod loyalty;
pub mod model;
pub mod repo;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::user_routes())
        .merge(handlers::customer_routes())
        .merge(handlers::employee_routes())
}
