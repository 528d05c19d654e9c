use std::sync::Arc;

use async_trait::async_trait;
use leadline_core::{AppError, AppResult};
use leadline_domain::{Principal, Role};
use tokio::sync::Mutex;

use crate::{AuditEntry, AuditSink};

use super::AuditRecorder;

#[derive(Default)]
struct CollectingSink {
    entries: Mutex<Vec<AuditEntry>>,
}

#[async_trait]
impl AuditSink for CollectingSink {
    async fn write(&self, entry: AuditEntry) -> AppResult<()> {
        self.entries.lock().await.push(entry);
        Ok(())
    }
}

struct BrokenSink;

#[async_trait]
impl AuditSink for BrokenSink {
    async fn write(&self, _entry: AuditEntry) -> AppResult<()> {
        Err(AppError::Internal("audit store offline".to_owned()))
    }
}

fn entry(status: u16) -> AuditEntry {
    let principal =
        Principal::new("rep-1", "Rita", Role::SalesRep).unwrap_or_else(|_| unreachable!());
    AuditEntry::for_principal(
        &principal,
        "DELETE",
        "/api/leads/42",
        status,
        Some("10.0.0.7".to_owned()),
    )
}

#[tokio::test]
async fn record_forwards_entry_to_sink() {
    let sink = Arc::new(CollectingSink::default());
    let recorder = AuditRecorder::new(sink.clone());

    recorder.record(entry(403)).await;

    let entries = sink.entries.lock().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].principal_id, "rep-1");
    assert_eq!(entries[0].principal_username, "Rita");
    assert_eq!(entries[0].role, Role::SalesRep);
    assert_eq!(entries[0].status, 403);
    assert!(entries[0].is_denial());
    assert_eq!(entries[0].origin.as_deref(), Some("10.0.0.7"));
}

#[tokio::test]
async fn record_swallows_sink_failures() {
    let recorder = AuditRecorder::new(Arc::new(BrokenSink));

    recorder.record(entry(200)).await;
}

#[test]
fn success_statuses_are_not_denials() {
    assert!(!entry(200).is_denial());
    assert!(entry(401).is_denial());
}
