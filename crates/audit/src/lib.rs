//! Audit trail model.
//!
//! Entries are append-only: they are built here, written once by the
//! recorder in `dealerhub-infra`, and only ever read back newest first.

pub mod action;
pub mod entry;
pub mod page;

pub use action::AuditAction;
pub use entry::{Actor, AuditEntry, NewAuditEntry};
pub use page::{DEALER_PAGE_MAX, GLOBAL_PAGE_MAX, PageScope, clamp_limit};
