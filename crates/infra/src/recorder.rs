//! Audit Recorder.
//!
//! `record` never fails from the caller's point of view: a failed write is
//! logged at `warn` and the triggering operation carries on.

use std::sync::Arc;

use tracing::warn;

use dealerhub_audit::{AuditEntry, NewAuditEntry, PageScope, clamp_limit};
use dealerhub_core::{AuditEntryId, Clock, DealerId};

use crate::store::{AuditStore, StoreError};

#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
    clock: Arc<dyn Clock>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn record(&self, entry: NewAuditEntry) {
        let action = entry.action;
        let sealed = entry.seal(AuditEntryId::new(), self.clock.now());
        if let Err(e) = self.store.append_audit(&sealed).await {
            warn!(
                error = %e,
                action = %action,
                who = %sealed.who_user_id,
                "audit write failed; continuing"
            );
        }
    }

    /// Global view, newest first. `limit` is clamped to the global cap.
    pub async fn recent(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>, StoreError> {
        self.store.list_audit(clamp_limit(limit, PageScope::Global)).await
    }

    /// One dealer's view, newest first. `limit` is clamped to the per-dealer cap.
    pub async fn recent_for_dealer(
        &self,
        dealer: DealerId,
        limit: Option<usize>,
    ) -> Result<Vec<AuditEntry>, StoreError> {
        self.store
            .list_audit_for_dealer(dealer, clamp_limit(limit, PageScope::Dealer))
            .await
    }
}
