use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ScraperRunRequest, ScraperStatus, SCRAPER_PATH},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod launcher;

use app_state::AppState;
use config::load_settings;
use launcher::{CommandLauncher, NoopLauncher, ScraperLauncher};

const MAX_RUN_REQUEST_BYTES: usize = 16 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let launcher: Arc<dyn ScraperLauncher> = match &settings.scraper_command {
        Some(command) => {
            info!(%command, "scraper runs will spawn a command");
            Arc::new(CommandLauncher::new(command.clone()))
        }
        None => Arc::new(NoopLauncher),
    };
    let app = build_router(Arc::new(AppState::new(launcher)));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(SCRAPER_PATH, get(scraper_status).post(start_scraper))
        .layer(RequestBodyLimitLayer::new(MAX_RUN_REQUEST_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn scraper_status(State(state): State<Arc<AppState>>) -> Json<ScraperStatus> {
    Json(ScraperStatus {
        runs_started: state.runs_started(),
    })
}

/// Kicks off one scraper run. The body must be JSON and its content is ignored.
async fn start_scraper(
    State(state): State<Arc<AppState>>,
    request: Result<Json<ScraperRunRequest>, JsonRejection>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let Json(_request) = request.map_err(|rejection| {
        warn!(status = %rejection.status(), "rejected scraper run request");
        (
            rejection.status(),
            Json(ApiError::new(ErrorCode::Validation, rejection.body_text())),
        )
    })?;

    info!("kicking off scraper");
    state.launcher.launch().await.map_err(|e| {
        let message = format!("{e:#}");
        error!(error = %message, "scraper launch failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::LaunchFailed, message)),
        )
    })?;
    let runs_started = state.record_run();
    info!(runs_started, "scraper run started");
    Ok(StatusCode::OK)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
