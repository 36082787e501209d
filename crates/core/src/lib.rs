//! CADIA Core - order domain model for the print-order intake service.
//!
//! This crate is shared by:
//! - `intake` - the web service that collects, stores and forwards orders
//! - `integration-tests` - black-box tests of the intake workflow
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP,
//! no SMTP. Everything here can be exercised without a filesystem or network.
//!
//! # Modules
//!
//! - [`types`] - Newtypes for emails, quantities, colors and order identifiers
//! - [`order`] - Submissions, the validator, and persisted order records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod order;
pub mod types;

pub use order::*;
pub use types::*;
