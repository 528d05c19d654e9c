mod common;
mod leads;
mod security;

pub use common::HealthResponse;
pub use leads::{ImportReportResponse, LeadRequest, LeadResponse};
pub use security::PrincipalResponse;
