//! Infrastructure layer: persistence, credentials, audit recording and mail.

pub mod credentials;
pub mod mailer;
pub mod recorder;
pub mod store;

pub use credentials::{CredentialError, CredentialStore, TemporaryCredential};
pub use mailer::{LogMailer, MailError, Mailer, OutboundMail};
pub use recorder::AuditRecorder;
pub use store::{
    AuditStore, CustomerStore, DealerStore, EmployeeStore, InMemoryPortalStore, PortalStore, PostgresPortalStore,
    StoreError,
};
