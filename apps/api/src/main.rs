//! Leadline API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::env;
use std::net::SocketAddr;

use leadline_core::AppError;
use tracing::info;

use crate::api_config::{ApiConfig, AuditSinkConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{build_app_state_from_config, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    if env::args().nth(1).as_deref() == Some("migrate") {
        let AuditSinkConfig::Postgres { database_url } = &config.audit_sink else {
            return Err(AppError::Validation(
                "migrate requires AUDIT_SINK=postgres and DATABASE_URL".to_owned(),
            ));
        };
        connect_and_migrate(database_url).await?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = build_app_state_from_config(&config).await?;
    let app = build_router(app_state, config.cors_allowed_origin.as_deref())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, audit_sink = config.audit_sink.kind(), "leadline-api listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
