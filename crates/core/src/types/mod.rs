//! Core types for CADIA orders.
//!
//! This module provides type-safe wrappers for the values an order form
//! collects.

pub mod color;
pub mod email;
pub mod order_id;
pub mod quantity;

pub use color::{Color, ColorParseError};
pub use email::{Email, EmailError};
pub use order_id::OrderId;
pub use quantity::{Quantity, QuantityError};
