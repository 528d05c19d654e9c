//! Application services and ports.

#![forbid(unsafe_code)]

mod audit_ports;
mod audit_recorder;
mod authorization_service;
mod lead_ports;
mod lead_service;

pub use audit_ports::{AuditEntry, AuditSink};
pub use audit_recorder::AuditRecorder;
pub use authorization_service::{
    AccessDecision, AuthorizationRequest, AuthorizationService, ForbiddenReason, RecordScope,
};
pub use lead_ports::{LeadListQuery, LeadRepository};
pub use lead_service::{ImportReport, LeadService};
