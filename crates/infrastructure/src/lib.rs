//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_sink;
mod in_memory_lead_repository;
mod postgres_audit_sink;
mod tracing_audit_sink;

pub use in_memory_audit_sink::InMemoryAuditSink;
pub use in_memory_lead_repository::InMemoryLeadRepository;
pub use postgres_audit_sink::PostgresAuditSink;
pub use tracing_audit_sink::TracingAuditSink;
