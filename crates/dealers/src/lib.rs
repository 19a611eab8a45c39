//! Dealers domain module: tenant accounts and their lifecycle.
//!
//! Pure domain logic (no IO, no HTTP, no storage). The service layer persists
//! the evolved `Dealer` as one row write.

pub mod dealer;
pub mod validate;

pub use dealer::{Dealer, DealerCommand, DealerEvent, DealerStatus};
pub use validate::{DealerProfileUpdate, NewDealer};
