use anyhow::Context;

mod app;
mod auth;
mod baggage;
mod config;
mod dashboard;
mod directory;
mod error;
mod extract;
mod flights;
mod notify;
mod payroll;
mod reservations;
mod schedules;
mod state;
mod store;


use crate::auth::verification::SWEEP_INTERVAL;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "skydesk=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    if let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        auth::services::ensure_admin(&state, &email, &password)
            .await
            .context("bootstrap admin")?;
    }

    let _sweeper = state.codes.spawn_sweeper(SWEEP_INTERVAL);

    app::serve(app::build_app(state)).await
}
