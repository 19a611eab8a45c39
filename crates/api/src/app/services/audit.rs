use dealerhub_audit::AuditEntry;
use dealerhub_core::DealerId;

use crate::app::errors::ApiError;

use super::AppServices;

impl AppServices {
    pub async fn audit_log(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>, ApiError> {
        Ok(self.audit.recent(limit).await?)
    }

    pub async fn dealer_audit_log(&self, dealer: DealerId, limit: Option<usize>) -> Result<Vec<AuditEntry>, ApiError> {
        self.get_dealer(dealer).await?;
        Ok(self.audit.recent_for_dealer(dealer, limit).await?)
    }
}
