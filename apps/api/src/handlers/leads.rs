use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use leadline_domain::Principal;
use uuid::Uuid;

use crate::dto::{ImportReportResponse, LeadRequest, LeadResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_leads_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<LeadResponse>>> {
    let leads = state
        .lead_service
        .list_leads(&principal)
        .await?
        .into_iter()
        .map(LeadResponse::from)
        .collect();

    Ok(Json(leads))
}

pub async fn create_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<LeadRequest>,
) -> ApiResult<(StatusCode, Json<LeadResponse>)> {
    let lead = state
        .lead_service
        .create_lead(&principal, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(LeadResponse::from(lead))))
}

pub async fn get_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(lead_id): Path<Uuid>,
) -> ApiResult<Json<LeadResponse>> {
    let lead = state.lead_service.get_lead(&principal, lead_id).await?;

    Ok(Json(LeadResponse::from(lead)))
}

pub async fn update_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(lead_id): Path<Uuid>,
    Json(payload): Json<LeadRequest>,
) -> ApiResult<Json<LeadResponse>> {
    let lead = state
        .lead_service
        .update_lead(&principal, lead_id, payload.into())
        .await?;

    Ok(Json(LeadResponse::from(lead)))
}

pub async fn delete_lead_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(lead_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.lead_service.delete_lead(&principal, lead_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn export_leads_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<impl IntoResponse> {
    let text = state.lead_service.export_leads(&principal).await?;

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"leads.csv\""),
        ],
        text,
    ))
}

pub async fn import_leads_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: String,
) -> ApiResult<(StatusCode, Json<ImportReportResponse>)> {
    let report = state
        .lead_service
        .import_leads(&principal, body.as_str())
        .await?;

    let status = if report.valid {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((status, Json(ImportReportResponse::from(report))))
}
