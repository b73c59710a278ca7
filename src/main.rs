use std::time::Duration;

use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

mod api;
mod config;
mod db;
mod error;
mod lifecycle;
mod utils;

use crate::api::project::ProjectDoc;
use crate::api::request::RequestDoc;
use crate::api::user::UserDoc;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("sourcestream_backend=info".parse()?),
        )
        .init();

    let pool = db::pool::connect(&config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let api_doc = UserDoc::openapi()
        .merge_from(ProjectDoc::openapi())
        .merge_from(RequestDoc::openapi());

    let app = Router::new()
        .merge(api::health::health_routes())
        .merge(api::user::user_routes())
        .merge(api::project::project_routes())
        .merge(api::request::request_routes())
        .route(
            "/api-docs/openapi.json",
            get(move || {
                let doc = api_doc.clone();
                async move { Json(doc) }
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .with_state(pool.clone());

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("closing database pool");
    pool.close().await;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("received Ctrl+C, shutting down");
}
