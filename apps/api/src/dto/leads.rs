use chrono::SecondsFormat;
use leadline_application::ImportReport;
use leadline_domain::{Lead, LeadInput};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for lead creation and replacement.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/lead-request.ts"
)]
pub struct LeadRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl From<LeadRequest> for LeadInput {
    fn from(value: LeadRequest) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            company: value.company,
            status: value.status,
        }
    }
}

/// API representation of a lead.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/lead-response.ts"
)]
pub struct LeadResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub owner_id: String,
    pub created_at: String,
}

impl From<Lead> for LeadResponse {
    fn from(value: Lead) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_owned(),
            email: value.email().map(str::to_owned),
            phone: value.phone().map(str::to_owned),
            company: value.company().map(str::to_owned),
            status: value.status().to_owned(),
            owner_id: value.owner_id().to_owned(),
            created_at: value
                .created_at()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Outcome of a lead import request.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/import-report-response.ts"
)]
pub struct ImportReportResponse {
    pub valid: bool,
    pub errors: Vec<String>,
    pub imported: usize,
}

impl From<ImportReport> for ImportReportResponse {
    fn from(value: ImportReport) -> Self {
        Self {
            valid: value.valid,
            errors: value.errors,
            imported: value.imported,
        }
    }
}
