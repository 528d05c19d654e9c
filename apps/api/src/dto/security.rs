use leadline_domain::Principal;
use serde::Serialize;
use ts_rs::TS;

/// API representation of the calling principal and its effective permissions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/principal-response.ts"
)]
pub struct PrincipalResponse {
    pub id: String,
    pub username: String,
    pub role: String,
    pub permissions: Vec<String>,
}

impl PrincipalResponse {
    pub fn new(principal: &Principal, permissions: Vec<String>) -> Self {
        Self {
            id: principal.id().to_owned(),
            username: principal.username().to_owned(),
            role: principal.role().as_str().to_owned(),
            permissions,
        }
    }
}
