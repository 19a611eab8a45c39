use tracing::{info, warn};

use dealerhub_audit::{Actor, AuditAction, NewAuditEntry};
use dealerhub_auth::{ADMIN_SUBJECT, Identity, Role, require_dealer};
use dealerhub_core::DomainError;
use dealerhub_dealers::{Dealer, DealerStatus};
use dealerhub_infra::OutboundMail;

use crate::app::dto::{AdminView, DealerUserView, DealerView, UserView};
use crate::app::errors::ApiError;
use crate::context::{ClientIp, PrincipalContext};

use super::AppServices;

/// A signed session plus the user it belongs to.
#[derive(Debug)]
pub struct SessionGrant<U> {
    pub token: String,
    pub user: U,
}

fn admin_view(username: &str) -> AdminView {
    AdminView {
        id: ADMIN_SUBJECT.to_string(),
        username: username.to_string(),
        role: Role::Admin.as_str(),
    }
}

impl AppServices {
    pub async fn admin_login(&self, password: &str, ip: &ClientIp) -> Result<SessionGrant<AdminView>, ApiError> {
        self.credentials.verify_admin(password).await?;

        let username = self.credentials.admin_username().to_string();
        let claims = self.tokens.claims_for(ADMIN_SUBJECT, Role::Admin, username.clone());
        let token = self.tokens.issue(&claims)?;

        self.audit
            .record(NewAuditEntry::new(
                Actor::admin(ADMIN_SUBJECT, &username, ip.as_str()),
                AuditAction::Login,
                "Admin logged in",
            ))
            .await;
        info!(role = "admin", "login succeeded");

        Ok(SessionGrant {
            token,
            user: admin_view(&username),
        })
    }

    pub async fn dealer_login(
        &self,
        identifier: &str,
        password: &str,
        ip: &ClientIp,
    ) -> Result<SessionGrant<DealerView>, ApiError> {
        let dealer = self.credentials.verify(identifier, password).await?;

        let claims = self
            .tokens
            .claims_for(dealer.id.to_string(), Role::Dealer, dealer.username.clone());
        let token = self.tokens.issue(&claims)?;

        self.audit
            .record(
                NewAuditEntry::new(dealer_actor(&dealer, ip), AuditAction::Login, "Dealer logged in")
                    .scoped_to(dealer.id),
            )
            .await;
        info!(role = "dealer", dealer_id = %dealer.id, "login succeeded");

        Ok(SessionGrant {
            token,
            user: DealerView::from(&dealer),
        })
    }

    /// Resolve a bearer token into the request principal.
    ///
    /// Dealers are re-checked against the store on every request, so a
    /// suspended or deleted dealer's unexpired token stops working at once.
    pub async fn authenticate(&self, token: &str) -> Result<PrincipalContext, ApiError> {
        let claims = self.tokens.verify(token)?;
        let identity = Identity::try_from(&claims)?;
        match &identity {
            Identity::Admin { username } => {
                let name = format!("Admin ({username})");
                Ok(PrincipalContext::new(identity, name))
            }
            Identity::Dealer { dealer_id, .. } => {
                let dealer = self
                    .store
                    .get_dealer(*dealer_id)
                    .await?
                    .ok_or(ApiError::Domain(DomainError::Unauthenticated))?;
                dealer.ensure_active()?;
                Ok(PrincipalContext::new(identity, dealer.display_name()))
            }
        }
    }

    /// `None` for a missing, invalid or expired token, or a dealer that is
    /// gone or no longer ACTIVE.
    pub async fn current_user(&self, token: Option<&str>) -> Result<Option<UserView>, ApiError> {
        let Some(claims) = token.and_then(|t| self.tokens.verify(t).ok()) else {
            return Ok(None);
        };
        let Ok(identity) = Identity::try_from(&claims) else {
            return Ok(None);
        };
        match identity {
            Identity::Admin { username } => Ok(Some(UserView::Admin(admin_view(&username)))),
            Identity::Dealer { dealer_id, .. } => Ok(self
                .store
                .get_dealer(dealer_id)
                .await?
                .filter(|d| d.status == DealerStatus::Active)
                .map(|d| {
                    UserView::Dealer(DealerUserView {
                        dealer: DealerView::from(&d),
                        role: Role::Dealer.as_str(),
                    })
                })),
        }
    }

    /// Issue a temporary password and mail it. Unknown or inactive accounts
    /// are silently ignored; the caller always answers `{ok:true}`.
    pub async fn forgot_password(&self, identifier: &str, ip: &ClientIp) {
        if let Err(e) = self.try_forgot_password(identifier, ip).await {
            warn!(error = %e, "forgot-password request failed");
        }
    }

    async fn try_forgot_password(&self, identifier: &str, ip: &ClientIp) -> Result<(), ApiError> {
        let identifier = identifier.trim().to_lowercase();
        let Some(dealer) = self.store.find_dealer_by_login(&identifier).await? else {
            return Ok(());
        };
        if dealer.status != DealerStatus::Active {
            return Ok(());
        }

        let (dealer, temp) = self.credentials.issue_temporary_password(dealer.id).await?;

        let mail = OutboundMail {
            to: dealer.email.clone(),
            subject: "Your temporary password".to_string(),
            body: format!(
                "Hello {}, your temporary password is {}. You will be asked to change it after signing in.",
                dealer.contact_name(), temp
            ),
        };
        if let Err(e) = self.mailer.send(mail).await {
            warn!(error = %e, dealer_id = %dealer.id, "temporary password mail failed");
        }

        self.audit
            .record(
                NewAuditEntry::new(
                    dealer_actor(&dealer, ip),
                    AuditAction::ResetPassword,
                    "Requested password reset",
                )
                .scoped_to(dealer.id),
            )
            .await;
        Ok(())
    }

    pub async fn change_password(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let dealer_id = require_dealer(principal.identity())?;
        self.credentials.set_password(dealer_id, new_password).await?;
        self.audit
            .record(
                NewAuditEntry::new(principal.actor(ip), AuditAction::ChangePassword, "Changed password")
                    .scoped_to(dealer_id),
            )
            .await;
        Ok(())
    }
}

pub(crate) fn dealer_actor(dealer: &Dealer, ip: &ClientIp) -> Actor {
    Actor::new(dealer.id.to_string(), dealer.display_name(), ip.as_str())
}
