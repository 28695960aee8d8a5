mod app;
mod auth;
mod config;
mod error;
mod projects;
mod seed;
mod state;
mod store;
mod views;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "showcase=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init()?;

    if app_state.config.seed_demo {
        if let Err(e) = seed::seed_demo(&app_state.store).await {
            tracing::warn!(error = %e, "demo seed failed; continuing");
        }
    }

    let addr = app_state.config.bind_addr();
    let router = app::build_app(app_state);
    app::serve(router, &addr).await
}
