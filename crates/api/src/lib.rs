//! Dealer portal HTTP API: routing, sessions and request/response mapping.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
