use async_trait::async_trait;
use leadline_application::{AuditEntry, AuditSink};
use leadline_core::AppResult;
use tokio::sync::Mutex;

/// Audit sink that keeps entries in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of recorded entries in write order.
    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn write(&self, entry: AuditEntry) -> AppResult<()> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use leadline_application::{AuditEntry, AuditSink};
    use leadline_domain::{Principal, Role};

    use super::InMemoryAuditSink;

    #[tokio::test]
    async fn entries_are_kept_in_write_order() {
        let sink = InMemoryAuditSink::new();
        let principal =
            Principal::new("mgr", "Morgan", Role::Manager).unwrap_or_else(|_| unreachable!());

        for status in [200, 403] {
            let entry = AuditEntry::for_principal(&principal, "GET", "/api/leads", status, None);
            assert!(sink.write(entry).await.is_ok());
        }

        let statuses: Vec<u16> = sink
            .entries()
            .await
            .iter()
            .map(|entry| entry.status)
            .collect();
        assert_eq!(statuses, vec![200, 403]);
    }
}
