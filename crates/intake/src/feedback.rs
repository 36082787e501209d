//! User-facing messages for a submission.
//!
//! [`FeedbackRenderer`] is a pure projection of a workflow outcome into the
//! messages and order summary the order page shows. It keeps no state between
//! submissions.

use cadia_core::{OrderRecord, ValidationError};

use crate::config::BrandingConfig;
use crate::routes::collect::{ACCEPTED_EXTENSION, CollectError};
use crate::services::{NotificationStatus, SubmissionOutcome};

/// Everything the order page says about the last submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub notices: Vec<String>,
    pub confirmation: Option<OrderSummary>,
}

impl Feedback {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
            && self.warnings.is_empty()
            && self.notices.is_empty()
            && self.confirmation.is_none()
    }

    fn error(message: String) -> Self {
        Self {
            errors: vec![message],
            ..Self::default()
        }
    }
}

/// Summary of an accepted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSummary {
    pub order_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_lines: Vec<String>,
    pub file_name: String,
    pub color: String,
    pub quantity: u32,
    pub special_instructions: Option<String>,
}

impl From<&OrderRecord> for OrderSummary {
    fn from(record: &OrderRecord) -> Self {
        Self {
            order_id: record.order_id.to_string(),
            name: record.customer.name.clone(),
            email: record.customer.email.clone(),
            phone: record.customer.phone.clone(),
            address_lines: record.address.lines(),
            file_name: record.file_name.clone(),
            color: record.color.clone(),
            quantity: record.quantity.get(),
            special_instructions: record.instructions().map(String::from),
        }
    }
}

/// Turns outcomes into [`Feedback`].
#[derive(Debug, Clone, Copy)]
pub struct FeedbackRenderer<'a> {
    branding: &'a BrandingConfig,
}

impl<'a> FeedbackRenderer<'a> {
    #[must_use]
    pub const fn new(branding: &'a BrandingConfig) -> Self {
        Self { branding }
    }

    /// Feedback for a finished workflow.
    #[must_use]
    pub fn render(&self, outcome: &SubmissionOutcome) -> Feedback {
        match outcome {
            SubmissionOutcome::Rejected(err) => Feedback::error(validation_message(err)),
            SubmissionOutcome::PersistFailed(_) => Feedback::error(format!(
                "We could not save your order. Nothing was submitted; please try again \
                 later or contact us at {}.",
                self.branding.support_email
            )),
            SubmissionOutcome::Done {
                stored,
                notification,
            } => {
                let mut feedback = Feedback {
                    confirmation: Some(OrderSummary::from(&stored.record)),
                    ..Feedback::default()
                };
                match notification {
                    NotificationStatus::Sent { to } => feedback
                        .notices
                        .push(format!("Email notification sent successfully to {to}")),
                    NotificationStatus::Failed(err) => feedback
                        .warnings
                        .push(format!("Could not send email notification: {err}")),
                }
                feedback
            }
        }
    }

    /// Feedback for a form whose values never made it to the validator.
    #[must_use]
    pub fn collection_failed(&self, err: &CollectError) -> Feedback {
        let message = match err {
            CollectError::UnsupportedFileType(_) => {
                format!("Please upload a .{ACCEPTED_EXTENSION} file.")
            }
            CollectError::InvalidQuantity(_) => {
                "Quantity must be a whole number of at least 1.".to_string()
            }
            CollectError::UnknownColor(_) => {
                "Please choose a material color from the list.".to_string()
            }
        };
        Feedback::error(message)
    }
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::MissingFile => format!("Please upload a .{ACCEPTED_EXTENSION} file."),
        ValidationError::TermsNotAccepted => {
            "You must agree to the terms and conditions.".to_string()
        }
        ValidationError::MissingRequiredFields(fields) => format!(
            "Please fill in the following required fields: {}",
            fields
                .iter()
                .map(|f| f.label())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        ValidationError::InvalidContactDetails(advisories) => format!(
            "Please check your contact details: {}",
            advisories
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}
