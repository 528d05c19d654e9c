use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadline_core::AppResult;
use leadline_domain::{Principal, Role};
use serde::{Deserialize, Serialize};

/// One audited request outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Moment the entry was assembled.
    pub timestamp: DateTime<Utc>,
    /// Acting principal identifier.
    pub principal_id: String,
    /// Acting principal display name.
    pub principal_username: String,
    /// Role held at request time.
    pub role: Role,
    /// HTTP method of the request.
    pub method: String,
    /// Request path without query string.
    pub path: String,
    /// Final response status code.
    pub status: u16,
    /// Client origin address, when known.
    pub origin: Option<String>,
}

impl AuditEntry {
    /// Builds an entry for an authenticated principal, stamped with the current time.
    #[must_use]
    pub fn for_principal(
        principal: &Principal,
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        origin: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            principal_id: principal.id().to_owned(),
            principal_username: principal.username().to_owned(),
            role: principal.role(),
            method: method.into(),
            path: path.into(),
            status,
            origin,
        }
    }

    /// Returns whether the recorded outcome was a denial.
    #[must_use]
    pub fn is_denial(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

/// Port for persisting audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Writes one audit entry.
    async fn write(&self, entry: AuditEntry) -> AppResult<()>;
}
