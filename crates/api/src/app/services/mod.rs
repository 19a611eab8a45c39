//! Service wiring and the operations behind each route.
//!
//! One `impl AppServices` block per area:
//! - `auth.rs`: login, session resolution, password flows
//! - `dealers.rs`: admin dealer lifecycle
//! - `records.rs`: tenant-scoped employees and customers
//! - `search.rs`: universal search
//! - `audit.rs`: audit trail views

use std::sync::Arc;

use tracing::{info, warn};

use dealerhub_auth::TokenService;
use dealerhub_core::{Clock, SystemClock};
use dealerhub_infra::{
    AuditRecorder, CredentialStore, InMemoryPortalStore, LogMailer, Mailer, PortalStore, PostgresPortalStore,
    StoreError,
};

use crate::config::AppConfig;

mod audit;
mod auth;
mod dealers;
mod records;
mod search;

pub use auth::SessionGrant;

pub struct AppServices {
    store: Arc<dyn PortalStore>,
    credentials: CredentialStore,
    tokens: TokenService,
    audit: AuditRecorder,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    cookie_secure: bool,
    trust_proxy: bool,
}

impl AppServices {
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    pub fn trust_proxy(&self) -> bool {
        self.trust_proxy
    }
}

/// Pick the store from configuration and wire everything around it.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    match &config.database_url {
        Some(url) => {
            let store = Arc::new(PostgresPortalStore::connect(url).await?);
            info!("using postgres store");
            Ok(wire(store, config, clock, Arc::new(LogMailer)))
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store");
            Ok(wire(Arc::new(InMemoryPortalStore::new()), config, clock, Arc::new(LogMailer)))
        }
    }
}

/// Wire services around a concrete store.
pub fn wire<S>(store: Arc<S>, config: &AppConfig, clock: Arc<dyn Clock>, mailer: Arc<dyn Mailer>) -> AppServices
where
    S: PortalStore + 'static,
{
    let credentials = CredentialStore::new(
        store.clone(),
        config.admin.clone(),
        config.admin_username.clone(),
        config.bcrypt_cost,
    );
    let audit = AuditRecorder::new(store.clone(), clock.clone());
    let tokens = TokenService::new(config.jwt_secret.as_bytes(), clock.clone());

    AppServices {
        store,
        credentials,
        tokens,
        audit,
        mailer,
        clock,
        cookie_secure: config.cookie_secure,
        trust_proxy: config.trust_proxy,
    }
}
