use std::sync::Arc;

use leadline_application::{AuditRecorder, AuditSink, AuthorizationService, LeadService};
use leadline_core::AppError;
use leadline_infrastructure::{InMemoryLeadRepository, PostgresAuditSink, TracingAuditSink};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, AuditSinkConfig};
use crate::state::AppState;

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    Ok(pool)
}

pub async fn build_audit_sink(config: &AuditSinkConfig) -> Result<Arc<dyn AuditSink>, AppError> {
    let sink: Arc<dyn AuditSink> = match config {
        AuditSinkConfig::Tracing => Arc::new(TracingAuditSink::new()),
        AuditSinkConfig::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            info!("audit entries persisted to postgres");
            Arc::new(PostgresAuditSink::new(pool))
        }
    };

    Ok(sink)
}

pub fn build_app_state(audit_sink: Arc<dyn AuditSink>, trust_forwarded_for: bool) -> AppState {
    let authorization_service = AuthorizationService::new();
    let lead_service = LeadService::new(
        Arc::new(InMemoryLeadRepository::new()),
        authorization_service,
    );

    AppState {
        lead_service,
        authorization_service,
        audit_recorder: AuditRecorder::new(audit_sink),
        trust_forwarded_for,
    }
}

pub async fn build_app_state_from_config(config: &ApiConfig) -> Result<AppState, AppError> {
    let audit_sink = build_audit_sink(&config.audit_sink).await?;
    Ok(build_app_state(audit_sink, config.trust_forwarded_for))
}
