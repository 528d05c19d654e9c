use axum::Json;
use axum::extract::{Extension, State};
use leadline_domain::{Permission, Principal};

use crate::dto::PrincipalResponse;
use crate::state::AppState;

pub async fn me_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Json<PrincipalResponse> {
    let permissions = Permission::all()
        .iter()
        .filter(|permission| {
            state
                .authorization_service
                .has_permission(principal.role(), **permission)
        })
        .map(|permission| permission.as_str().to_owned())
        .collect();

    Json(PrincipalResponse::new(&principal, permissions))
}
