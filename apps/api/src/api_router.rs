use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use leadline_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    cors_allowed_origin: Option<&str>,
) -> Result<Router, AppError> {
    // Layers run bottom-up: the principal is resolved first, audit sees the final status.
    let protected_routes = Router::new()
        .route(
            "/api/security/me",
            get(handlers::security::me_handler),
        )
        .route(
            "/api/leads",
            get(handlers::leads::list_leads_handler).post(handlers::leads::create_lead_handler),
        )
        .route(
            "/api/leads/export",
            get(handlers::leads::export_leads_handler),
        )
        .route(
            "/api/leads/import",
            post(handlers::leads::import_leads_handler),
        )
        .route(
            "/api/leads/{lead_id}",
            get(handlers::leads::get_lead_handler)
                .put(handlers::leads::update_lead_handler)
                .delete(handlers::leads::delete_lead_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::audit_requests,
        ))
        .route_layer(from_fn(middleware::require_principal));

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = cors_allowed_origin {
        app = app.layer(cors::build_cors_layer(origin)?);
    }

    Ok(app.with_state(app_state))
}

#[cfg(test)]
mod tests;
