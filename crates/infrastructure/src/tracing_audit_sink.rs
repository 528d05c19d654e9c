use async_trait::async_trait;
use leadline_application::{AuditEntry, AuditSink};
use leadline_core::AppResult;
use tracing::{info, warn};

/// Audit sink that emits one structured event per entry on the `audit` target.
///
/// Denied requests (401/403) are emitted at `warn`, everything else at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl TracingAuditSink {
    /// Creates a tracing-backed sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn write(&self, entry: AuditEntry) -> AppResult<()> {
        let timestamp = entry.timestamp.to_rfc3339();
        let origin = entry.origin.as_deref().unwrap_or("-");

        if entry.is_denial() {
            warn!(
                target: "audit",
                timestamp = %timestamp,
                principal_id = %entry.principal_id,
                principal_username = %entry.principal_username,
                role = entry.role.as_str(),
                method = %entry.method,
                path = %entry.path,
                status = entry.status,
                origin,
                "request denied"
            );
        } else {
            info!(
                target: "audit",
                timestamp = %timestamp,
                principal_id = %entry.principal_id,
                principal_username = %entry.principal_username,
                role = entry.role.as_str(),
                method = %entry.method,
                path = %entry.path,
                status = entry.status,
                origin,
                "request audited"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use leadline_application::{AuditEntry, AuditSink};
    use leadline_domain::{Principal, Role};

    use super::TracingAuditSink;

    #[tokio::test]
    async fn writes_allowed_and_denied_entries() {
        let sink = TracingAuditSink::new();
        let principal =
            Principal::new("rep-1", "Riley", Role::SalesRep).unwrap_or_else(|_| unreachable!());

        for status in [200, 401, 403, 500] {
            let entry = AuditEntry::for_principal(
                &principal,
                "DELETE",
                "/api/leads/abc",
                status,
                Some("203.0.113.7".to_owned()),
            );
            assert_eq!(entry.is_denial(), matches!(status, 401 | 403));
            assert!(sink.write(entry).await.is_ok());
        }
    }
}
