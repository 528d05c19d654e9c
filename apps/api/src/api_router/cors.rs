use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use leadline_core::AppError;
use tower_http::cors::CorsLayer;

use crate::middleware::{PRINCIPAL_ID_HEADER, PRINCIPAL_NAME_HEADER, PRINCIPAL_ROLE_HEADER};

pub(super) fn build_cors_layer(allowed_origin: &str) -> Result<CorsLayer, AppError> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(allowed_origin).map_err(|error| {
            AppError::Internal(format!("invalid CORS_ALLOWED_ORIGIN: {error}"))
        })?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(PRINCIPAL_ID_HEADER),
            HeaderName::from_static(PRINCIPAL_NAME_HEADER),
            HeaderName::from_static(PRINCIPAL_ROLE_HEADER),
        ]))
}
