//! Side-effecting services behind the order form.
//!
//! - [`storage`] - writes each order to its own directory
//! - [`email`] - sends the new-order notification over SMTP
//! - [`workflow`] - runs a submission through validation, storage and notification

pub mod email;
pub mod storage;
pub mod workflow;

pub use email::{EmailService, NotificationError, NotificationMessage, Notifier};
pub use storage::{DETAILS_FILE_NAME, OrderStore, PersistError, StoredOrder};
pub use workflow::{NotificationStatus, SubmissionOutcome, submit_order};
