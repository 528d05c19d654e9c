use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use leadline_application::AuditEntry;
use leadline_core::AppError;
use leadline_domain::{Principal, Role};

use crate::error::ApiResult;
use crate::state::AppState;

pub const PRINCIPAL_ID_HEADER: &str = "x-principal-id";
pub const PRINCIPAL_NAME_HEADER: &str = "x-principal-name";
pub const PRINCIPAL_ROLE_HEADER: &str = "x-principal-role";
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Resolves the gateway-authenticated principal and stores it in request extensions.
pub async fn require_principal(mut request: Request, next: Next) -> ApiResult<Response> {
    let principal = principal_from_headers(request.headers())?;

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Records the final outcome of every authenticated request.
///
/// Runs after the handler has produced its response. The write is spawned so
/// the response is returned unchanged and without waiting on the sink.
pub async fn audit_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(principal) = request.extensions().get::<Principal>().cloned() else {
        return next.run(request).await;
    };

    let method = request.method().to_string();
    let path = request.uri().path().to_owned();
    let origin = request_origin(&request, state.trust_forwarded_for);

    let response = next.run(request).await;

    let entry = AuditEntry::for_principal(
        &principal,
        method,
        path,
        response.status().as_u16(),
        origin,
    );
    let recorder = state.audit_recorder.clone();
    tokio::spawn(async move {
        recorder.record(entry).await;
    });

    response
}

fn principal_from_headers(headers: &HeaderMap) -> Result<Principal, AppError> {
    let principal_id = header_text(headers, PRINCIPAL_ID_HEADER)
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let role = header_text(headers, PRINCIPAL_ROLE_HEADER)
        .ok_or_else(|| AppError::Validation(format!("{PRINCIPAL_ROLE_HEADER} header is required")))
        .and_then(Role::from_transport)?;

    let username = header_text(headers, PRINCIPAL_NAME_HEADER).unwrap_or_default();

    Principal::new(principal_id, username, role)
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn request_origin(request: &Request, trust_forwarded_for: bool) -> Option<String> {
    if trust_forwarded_for {
        let forwarded = header_text(request.headers(), FORWARDED_FOR_HEADER)
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(forwarded) = forwarded {
            return Some(forwarded.to_owned());
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(address)| address.ip().to_string())
}
