//! Order submissions, validation and persisted records.
//!
//! The flow through this module is one-way:
//!
//! ```text
//! OrderSubmission --validate()--> ValidatedOrder --OrderRecord::new()--> OrderRecord
//! ```
//!
//! An [`OrderRecord`] can only be built from a [`ValidatedOrder`], and a
//! `ValidatedOrder` can only be obtained from [`validate`].

pub mod record;
pub mod submission;
pub mod validation;

pub use record::{DETAILS_DATE_FORMAT, OrderRecord};
pub use submission::{Customer, OrderSubmission, ShippingAddress, UploadedFile};
pub use validation::{
    Advisory, RequiredField, ValidatedOrder, ValidationError, ValidationPolicy, advisories,
    validate,
};
