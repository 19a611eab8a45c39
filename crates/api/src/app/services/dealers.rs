use dealerhub_audit::{AuditAction, NewAuditEntry};
use dealerhub_core::{Aggregate, DealerId};
use dealerhub_dealers::{Dealer, DealerCommand, DealerProfileUpdate, NewDealer};

use crate::app::errors::ApiError;
use crate::context::{ClientIp, PrincipalContext};

use super::AppServices;

impl AppServices {
    /// Newest first.
    pub async fn list_dealers(&self) -> Result<Vec<Dealer>, ApiError> {
        Ok(self.store.list_dealers().await?)
    }

    pub async fn get_dealer(&self, id: DealerId) -> Result<Dealer, ApiError> {
        self.store
            .get_dealer(id)
            .await?
            .ok_or(ApiError::not_found("dealer"))
    }

    /// Create an ACTIVE dealer with a temporary password. Returns the plaintext once.
    pub async fn create_dealer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        payload: NewDealer,
    ) -> Result<(Dealer, String), ApiError> {
        let payload = payload.validated()?;
        let temp = self.credentials.temporary_credential().await?;
        let dealer = Dealer::create(DealerId::new(), payload, temp.hash, self.clock.now());
        self.store.insert_dealer(&dealer).await?;

        self.record_dealer_action(
            principal,
            ip,
            &dealer,
            AuditAction::CreateDealer,
            format!("Created dealer {}", dealer.company_name),
        )
        .await;
        Ok((dealer, temp.plaintext))
    }

    pub async fn update_dealer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: DealerId,
        update: DealerProfileUpdate,
    ) -> Result<Dealer, ApiError> {
        let dealer = self.apply_dealer_command(id, DealerCommand::UpdateProfile(update)).await?;
        self.record_dealer_action(
            principal,
            ip,
            &dealer,
            AuditAction::UpdateDealer,
            format!("Updated dealer {}", dealer.company_name),
        )
        .await;
        Ok(dealer)
    }

    pub async fn suspend_dealer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: DealerId,
        reason: String,
    ) -> Result<Dealer, ApiError> {
        let dealer = self.apply_dealer_command(id, DealerCommand::Suspend { reason }).await?;
        let details = format!(
            "Suspended dealer {}: {}",
            dealer.company_name,
            dealer.suspension_reason.as_deref().unwrap_or_default()
        );
        self.record_dealer_action(principal, ip, &dealer, AuditAction::SuspendDealer, details)
            .await;
        Ok(dealer)
    }

    pub async fn activate_dealer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: DealerId,
    ) -> Result<Dealer, ApiError> {
        let dealer = self.apply_dealer_command(id, DealerCommand::Activate).await?;
        self.record_dealer_action(
            principal,
            ip,
            &dealer,
            AuditAction::ActivateDealer,
            format!("Activated dealer {}", dealer.company_name),
        )
        .await;
        Ok(dealer)
    }

    pub async fn delete_dealer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: DealerId,
        reason: String,
    ) -> Result<Dealer, ApiError> {
        let at = self.clock.now();
        let dealer = self.apply_dealer_command(id, DealerCommand::Delete { reason, at }).await?;
        let details = format!(
            "Deleted dealer {}: {}",
            dealer.company_name,
            dealer.deletion_reason.as_deref().unwrap_or_default()
        );
        self.record_dealer_action(principal, ip, &dealer, AuditAction::DeleteDealer, details)
            .await;
        Ok(dealer)
    }

    /// Admin-initiated reset. Returns the new temporary password.
    pub async fn reset_dealer_password(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: DealerId,
    ) -> Result<String, ApiError> {
        let (dealer, temp) = self.credentials.issue_temporary_password(id).await?;
        self.record_dealer_action(
            principal,
            ip,
            &dealer,
            AuditAction::ResetPassword,
            format!("Reset password for dealer {}", dealer.company_name),
        )
        .await;
        Ok(temp)
    }

    /// Load, decide, apply and write back as one single-row update.
    async fn apply_dealer_command(&self, id: DealerId, command: DealerCommand) -> Result<Dealer, ApiError> {
        let mut dealer = self.get_dealer(id).await?;
        dealer.execute(&command)?;
        self.store.update_dealer(&dealer).await?;
        Ok(dealer)
    }

    /// Admin actions are scoped to the target dealer so they show up in its audit view.
    async fn record_dealer_action(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        dealer: &Dealer,
        action: AuditAction,
        details: String,
    ) {
        self.audit
            .record(NewAuditEntry::new(principal.actor(ip), action, details).scoped_to(dealer.id))
            .await;
    }
}
