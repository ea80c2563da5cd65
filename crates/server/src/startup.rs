use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use chrono::Duration;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::auth::{AuthService, TokenService};
use service::complaint::ComplaintService;
use service::notify::LogNotifier;
use service::storage::json::{JsonComplaintStore, JsonUserStore};

use crate::routes::{self, auth};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    // Fails fast on a missing or empty signing secret.
    let cfg = configs::AppConfig::load_and_validate()?;
    common::env::ensure_data_dir(&cfg.data_dir).await?;

    let data_dir = std::path::Path::new(&cfg.data_dir);
    let users = Arc::new(JsonUserStore::open(data_dir.join("users.json")).await?);
    let complaints = Arc::new(JsonComplaintStore::open(data_dir.join("complaints.json")).await?);

    let tokens = Arc::new(TokenService::new(
        &cfg.auth.secret,
        Duration::days(cfg.auth.token_ttl_days),
    ));
    let notifier = Arc::new(LogNotifier::new(cfg.notifications.smtp.is_some()));
    if cfg.notifications.smtp.is_none() {
        info!("smtp not configured; notifications will be logged and skipped");
    }

    let state = auth::ServerState {
        users: users.clone(),
        tokens: tokens.clone(),
        auth: Arc::new(AuthService::new(users, tokens)),
        complaints: Arc::new(ComplaintService::new(
            complaints,
            notifier,
            cfg.notifications.admin_email.clone(),
        )),
    };

    let app: Router = routes::build_router(build_cors(), state);

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting complaint desk server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
