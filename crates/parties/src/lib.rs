//! Parties domain module: the employees and customers a dealer manages.
//!
//! Every record is owned by exactly one dealer. The business identifier
//! (`aadhar` / `officialId`) is unique across all dealers; the store enforces
//! that on the normalized [`identity_key`](dealerhub_core::normalize::identity_key).

pub mod customer;
pub mod employee;
mod validate;

pub use customer::{Customer, CustomerCommand, CustomerEvent, CustomerStatus, CustomerType, CustomerUpdate, NewCustomer};
pub use employee::{Employee, EmployeeCommand, EmployeeEvent, EmployeeStatus, EmployeeUpdate, NewEmployee};
