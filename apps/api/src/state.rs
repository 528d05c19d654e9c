use leadline_application::{AuditRecorder, AuthorizationService, LeadService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub lead_service: LeadService,
    pub authorization_service: AuthorizationService,
    pub audit_recorder: AuditRecorder,
    pub trust_forwarded_for: bool,
}
