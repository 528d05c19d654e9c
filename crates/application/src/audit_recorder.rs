use std::sync::Arc;

use tracing::{debug, warn};

use crate::{AuditEntry, AuditSink};

/// Best-effort writer placed after every authenticated request.
///
/// Sink failures are logged and swallowed so they never reach the response.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    /// Creates a recorder over the given sink.
    #[must_use]
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    /// Writes one entry, logging instead of failing.
    pub async fn record(&self, entry: AuditEntry) {
        let method = entry.method.clone();
        let path = entry.path.clone();
        let status = entry.status;

        match self.sink.write(entry).await {
            Ok(()) => debug!(%method, %path, status, "audit entry recorded"),
            Err(error) => warn!(%error, %method, %path, status, "failed to record audit entry"),
        }
    }
}

#[cfg(test)]
mod tests;
