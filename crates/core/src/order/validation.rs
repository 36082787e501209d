//! Order validation.
//!
//! Checks run in a fixed precedence and the first failing check decides the
//! outcome:
//!
//! 1. a design file is attached
//! 2. the terms were accepted
//! 3. every required field is filled in (all gaps reported together)
//! 4. contact details look plausible, only under [`ValidationPolicy::strict_contact`]
//!
//! Without the strict policy, contact-format problems are returned by
//! [`advisories`] for logging and never block an order.

use core::fmt;

use crate::order::submission::{OrderSubmission, UploadedFile};
use crate::types::{Email, EmailError};

/// Form fields that must not be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Name,
    Email,
    Phone,
    AddressLine1,
    City,
    State,
    Zip,
    Country,
    /// Only required when the color is `Custom`.
    CustomColor,
}

impl RequiredField {
    /// Label shown next to the field on the form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::Email => "Email Address",
            Self::Phone => "Phone Number",
            Self::AddressLine1 => "Street Address",
            Self::City => "City",
            Self::State => "State/Province",
            Self::Zip => "ZIP/Postal Code",
            Self::Country => "Country",
            Self::CustomColor => "Custom Color",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Non-blocking remark about the shape of a contact field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    EmailShape(EmailError),
    PhoneWithoutDigits,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailShape(err) => write!(f, "Email Address looks invalid: {err}"),
            Self::PhoneWithoutDigits => f.write_str("Phone Number contains no digits"),
        }
    }
}

/// Why a submission was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no design file was attached")]
    MissingFile,

    #[error("terms and conditions were not accepted")]
    TermsNotAccepted,

    /// Never empty.
    #[error("missing required fields: {}", join_labels(.0))]
    MissingRequiredFields(Vec<RequiredField>),

    /// Only produced under the strict policy. Never empty.
    #[error("invalid contact details: {}", join_display(.0))]
    InvalidContactDetails(Vec<Advisory>),
}

fn join_labels(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(|f| f.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn join_display(advisories: &[Advisory]) -> String {
    advisories
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Knobs for [`validate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Reject orders whose contact details fail the advisory checks.
    pub strict_contact: bool,
}

/// A submission that passed every check, with its color resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    submission: OrderSubmission,
    file: UploadedFile,
    resolved_color: String,
}

impl ValidatedOrder {
    #[must_use]
    pub const fn submission(&self) -> &OrderSubmission {
        &self.submission
    }

    #[must_use]
    pub const fn file(&self) -> &UploadedFile {
        &self.file
    }

    /// The color to print in: the custom text when `Custom` was selected,
    /// the selected label otherwise.
    #[must_use]
    pub fn resolved_color(&self) -> &str {
        &self.resolved_color
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Run every check against `submission`.
///
/// # Errors
///
/// Returns the [`ValidationError`] of the first failing check, in the
/// precedence documented at module level.
pub fn validate(
    mut submission: OrderSubmission,
    policy: ValidationPolicy,
) -> Result<ValidatedOrder, ValidationError> {
    if submission.file.is_none() {
        return Err(ValidationError::MissingFile);
    }

    if !submission.terms_accepted {
        return Err(ValidationError::TermsNotAccepted);
    }

    let missing = missing_fields(&submission);
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequiredFields(missing));
    }

    if policy.strict_contact {
        let found = advisories(&submission);
        if !found.is_empty() {
            return Err(ValidationError::InvalidContactDetails(found));
        }
    }

    let resolved_color = if submission.color.is_custom() {
        submission
            .custom_color
            .as_deref()
            .unwrap_or_default()
            .to_string()
    } else {
        submission.color.label().to_string()
    };

    let Some(file) = submission.file.take() else {
        return Err(ValidationError::MissingFile);
    };

    Ok(ValidatedOrder {
        submission,
        file,
        resolved_color,
    })
}

fn missing_fields(submission: &OrderSubmission) -> Vec<RequiredField> {
    let customer = &submission.customer;
    let address = &submission.address;
    let custom_color = submission.custom_color.as_deref().unwrap_or_default();

    [
        (RequiredField::Name, customer.name.as_str()),
        (RequiredField::Email, customer.email.as_str()),
        (RequiredField::Phone, customer.phone.as_str()),
        (RequiredField::AddressLine1, address.line1.as_str()),
        (RequiredField::City, address.city.as_str()),
        (RequiredField::State, address.state.as_str()),
        (RequiredField::Zip, address.zip.as_str()),
        (RequiredField::Country, address.country.as_str()),
    ]
    .into_iter()
    .chain(
        submission
            .color
            .is_custom()
            .then_some((RequiredField::CustomColor, custom_color)),
    )
    .filter(|(_, value)| is_blank(value))
    .map(|(field, _)| field)
    .collect()
}

/// Format remarks about the contact fields. Empty fields are skipped; they
/// are reported by the required-field check instead.
#[must_use]
pub fn advisories(submission: &OrderSubmission) -> Vec<Advisory> {
    let mut found = Vec::new();
    let customer = &submission.customer;

    if !is_blank(&customer.email) {
        if let Err(err) = Email::parse(&customer.email) {
            found.push(Advisory::EmailShape(err));
        }
    }

    if !is_blank(&customer.phone) && !customer.phone.chars().any(|c| c.is_ascii_digit()) {
        found.push(Advisory::PhoneWithoutDigits);
    }

    found
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::order::submission::{Customer, ShippingAddress};
    use crate::types::{Color, Quantity};

    fn complete() -> OrderSubmission {
        OrderSubmission {
            customer: Customer {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: "555-1111".to_string(),
            },
            address: ShippingAddress {
                line1: "1 Main St".to_string(),
                line2: None,
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62704".to_string(),
                country: "USA".to_string(),
            },
            color: Color::Blue,
            custom_color: None,
            quantity: Quantity::new(3).unwrap(),
            special_instructions: String::new(),
            file: UploadedFile::new("part.step", vec![7; 10]),
            terms_accepted: true,
        }
    }

    #[test]
    fn test_complete_submission_is_valid() {
        let order = validate(complete(), ValidationPolicy::default()).unwrap();
        assert_eq!(order.resolved_color(), "Blue");
        assert_eq!(order.file().file_name(), "part.step");
        assert_eq!(order.file().content().len(), 10);
        assert!(order.submission().file.is_none());
    }

    #[test]
    fn test_missing_file_wins_over_everything() {
        let submission = OrderSubmission {
            file: None,
            terms_accepted: false,
            customer: Customer::default(),
            ..complete()
        };
        assert_eq!(
            validate(submission, ValidationPolicy::default()),
            Err(ValidationError::MissingFile)
        );
    }

    #[test]
    fn test_terms_checked_before_required_fields() {
        let submission = OrderSubmission {
            terms_accepted: false,
            customer: Customer::default(),
            ..complete()
        };
        assert_eq!(
            validate(submission, ValidationPolicy::default()),
            Err(ValidationError::TermsNotAccepted)
        );
    }

    #[test]
    fn test_all_missing_fields_reported_together() {
        let submission = OrderSubmission {
            customer: Customer::default(),
            address: ShippingAddress::default(),
            ..complete()
        };
        let err = validate(submission, ValidationPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredFields(vec![
                RequiredField::Name,
                RequiredField::Email,
                RequiredField::Phone,
                RequiredField::AddressLine1,
                RequiredField::City,
                RequiredField::State,
                RequiredField::Zip,
                RequiredField::Country,
            ])
        );
    }

    #[test]
    fn test_each_field_alone_is_reported_exactly() {
        let blankers: [(RequiredField, fn(&mut OrderSubmission)); 8] = [
            (RequiredField::Name, |s| s.customer.name.clear()),
            (RequiredField::Email, |s| s.customer.email.clear()),
            (RequiredField::Phone, |s| s.customer.phone.clear()),
            (RequiredField::AddressLine1, |s| s.address.line1.clear()),
            (RequiredField::City, |s| s.address.city.clear()),
            (RequiredField::State, |s| s.address.state.clear()),
            (RequiredField::Zip, |s| s.address.zip.clear()),
            (RequiredField::Country, |s| s.address.country.clear()),
        ];

        for (field, blank) in blankers {
            let mut submission = complete();
            blank(&mut submission);
            assert_eq!(
                validate(submission, ValidationPolicy::default()),
                Err(ValidationError::MissingRequiredFields(vec![field])),
                "blanking {field}"
            );
        }
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let mut submission = complete();
        submission.address.city = "   ".to_string();
        assert_eq!(
            validate(submission, ValidationPolicy::default()),
            Err(ValidationError::MissingRequiredFields(vec![
                RequiredField::City
            ]))
        );
    }

    #[test]
    fn test_address_line2_is_optional() {
        let mut submission = complete();
        submission.address.line2 = None;
        assert!(validate(submission, ValidationPolicy::default()).is_ok());
    }

    #[test]
    fn test_custom_color_resolves_to_free_text() {
        let submission = OrderSubmission {
            color: Color::Custom,
            custom_color: Some("Glow-in-the-dark green".to_string()),
            ..complete()
        };
        let order = validate(submission, ValidationPolicy::default()).unwrap();
        assert_eq!(order.resolved_color(), "Glow-in-the-dark green");
        assert_ne!(order.resolved_color(), "Custom");
    }

    #[test]
    fn test_custom_color_requires_text() {
        let submission = OrderSubmission {
            color: Color::Custom,
            custom_color: None,
            ..complete()
        };
        assert_eq!(
            validate(submission, ValidationPolicy::default()),
            Err(ValidationError::MissingRequiredFields(vec![
                RequiredField::CustomColor
            ]))
        );
    }

    #[test]
    fn test_custom_text_ignored_for_named_color() {
        let submission = OrderSubmission {
            color: Color::Red,
            custom_color: Some("Teal".to_string()),
            ..complete()
        };
        let order = validate(submission, ValidationPolicy::default()).unwrap();
        assert_eq!(order.resolved_color(), "Red");
    }

    #[test]
    fn test_bad_email_shape_does_not_block_by_default() {
        let mut submission = complete();
        submission.customer.email = "jane-at-x".to_string();
        submission.customer.phone = "call me".to_string();

        assert_eq!(
            advisories(&submission),
            vec![
                Advisory::EmailShape(EmailError::AtSymbol),
                Advisory::PhoneWithoutDigits
            ]
        );
        assert!(validate(submission, ValidationPolicy::default()).is_ok());
    }

    #[test]
    fn test_strict_policy_blocks_bad_contact_details() {
        let mut submission = complete();
        submission.customer.email = "jane-at-x".to_string();
        let policy = ValidationPolicy {
            strict_contact: true,
        };
        assert_eq!(
            validate(submission, policy),
            Err(ValidationError::InvalidContactDetails(vec![
                Advisory::EmailShape(EmailError::AtSymbol)
            ]))
        );
    }

    #[test]
    fn test_strict_policy_accepts_plausible_contact_details() {
        let policy = ValidationPolicy {
            strict_contact: true,
        };
        assert!(validate(complete(), policy).is_ok());
    }

    #[test]
    fn test_error_messages_list_labels() {
        let err = ValidationError::MissingRequiredFields(vec![
            RequiredField::Zip,
            RequiredField::Country,
        ]);
        assert_eq!(
            err.to_string(),
            "missing required fields: ZIP/Postal Code, Country"
        );
    }
}
