//! Lunar Shell server
//!
//! Thin HTTP shell around the single-page app: serves the built client and
//! relays the two endpoints the address bar needs (search suggestions and
//! bookmark icons). The wisp relay that carries tunneled page traffic is an
//! external collaborator and is not hosted here.

use anyhow::Result;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing_subscriber::{fmt, EnvFilter};

mod api;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(6060);
    let dist = std::env::var("LUNAR_DIST").unwrap_or_else(|_| "dist/client".to_string());

    let static_files = ServeDir::new(&dist).not_found_service(api::not_found.into_service());

    let app = Router::new()
        .route("/api/query", get(api::query))
        .route("/api/icon/", get(api::icon))
        .fallback_service(static_files)
        .with_state(api::AppState::new());

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, dist = %dist, "Lunar server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
