//! End-to-end tests of the order workflow against a real filesystem and an
//! unreachable SMTP relay.

#![allow(clippy::unwrap_used)]

use cadia_core::{Color, ValidationError, ValidationPolicy};
use cadia_integration_tests::{TestIntake, jane_doe_submission};
use cadia_intake::services::{
    DETAILS_FILE_NAME, NotificationStatus, SubmissionOutcome, submit_order,
};
use chrono::{NaiveDate, NaiveDateTime};

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[tokio::test]
async fn test_valid_order_is_stored_even_when_email_fails() {
    let intake = TestIntake::new();
    let state = &intake.state;

    let outcome = submit_order(
        state.store(),
        state.notifier(),
        jane_doe_submission(),
        state.validation_policy(),
        at(10, 0, 0),
    )
    .await;

    let SubmissionOutcome::Done {
        stored,
        notification,
    } = outcome
    else {
        panic!("expected the order to be stored");
    };
    assert!(matches!(notification, NotificationStatus::Failed(_)));
    assert!(!stored.collided);

    let dir = intake.orders_dir().join("20261019100000_Jane_Doe");
    assert_eq!(intake.order_dirs(), vec![dir.clone()]);
    assert_eq!(std::fs::read(dir.join("part.step")).unwrap(), b"0123456789");

    let details = std::fs::read_to_string(dir.join(DETAILS_FILE_NAME)).unwrap();
    assert!(details.starts_with("Order ID: 20261019100000_Jane_Doe\n"));
    assert!(details.contains("Date: 2026-10-19 10:00:00\n"));
    assert!(details.contains("Shipping Address:\n1 Main St\nSpringfield, IL 62704\nUSA\n"));
    assert!(details.contains("Color: Blue\n"));
    assert!(details.contains("Quantity: 3\n"));
}

#[tokio::test]
async fn test_custom_color_is_recorded_verbatim() {
    let intake = TestIntake::new();
    let state = &intake.state;

    let mut submission = jane_doe_submission();
    submission.color = Color::Custom;
    submission.custom_color = Some("Pearl White".to_string());

    let outcome = submit_order(
        state.store(),
        state.notifier(),
        submission,
        state.validation_policy(),
        at(11, 30, 0),
    )
    .await;
    assert!(outcome.is_done());

    let details = std::fs::read_to_string(
        intake
            .orders_dir()
            .join("20261019113000_Jane_Doe")
            .join(DETAILS_FILE_NAME),
    )
    .unwrap();
    assert!(details.contains("Color: Pearl White\n"));
}

#[tokio::test]
async fn test_invalid_order_leaves_no_trace() {
    let intake = TestIntake::new();
    let state = &intake.state;

    let mut submission = jane_doe_submission();
    submission.customer.name = "   ".to_string();
    submission.address.zip = String::new();

    let outcome = submit_order(
        state.store(),
        state.notifier(),
        submission,
        state.validation_policy(),
        at(12, 0, 0),
    )
    .await;

    let SubmissionOutcome::Rejected(ValidationError::MissingRequiredFields(fields)) = outcome
    else {
        panic!("expected missing fields");
    };
    assert_eq!(fields.len(), 2);
    assert!(intake.order_dirs().is_empty());
}

#[tokio::test]
async fn test_same_second_same_name_overwrites_directory() {
    let intake = TestIntake::new();
    let state = &intake.state;

    let first = submit_order(
        state.store(),
        state.notifier(),
        jane_doe_submission(),
        state.validation_policy(),
        at(9, 15, 0),
    )
    .await;
    assert!(first.is_done());

    let mut second_submission = jane_doe_submission();
    second_submission.quantity = "7".parse().unwrap();
    let second = submit_order(
        state.store(),
        state.notifier(),
        second_submission,
        state.validation_policy(),
        at(9, 15, 0),
    )
    .await;

    let SubmissionOutcome::Done { stored, .. } = second else {
        panic!("expected the second order to be stored");
    };
    assert!(stored.collided);
    assert_eq!(intake.order_dirs().len(), 1);

    let details =
        std::fs::read_to_string(intake.order_dirs()[0].join(DETAILS_FILE_NAME)).unwrap();
    assert!(details.contains("Quantity: 7\n"));
}

#[tokio::test]
async fn test_strict_policy_blocks_malformed_email() {
    let intake = TestIntake::with_env(&[("INTAKE_STRICT_CONTACT_VALIDATION", "true")]);
    let state = &intake.state;
    assert_eq!(state.validation_policy(), ValidationPolicy { strict_contact: true });

    let mut submission = jane_doe_submission();
    submission.customer.email = "not-an-email".to_string();

    let outcome = submit_order(
        state.store(),
        state.notifier(),
        submission,
        state.validation_policy(),
        at(13, 0, 0),
    )
    .await;

    assert!(matches!(
        outcome,
        SubmissionOutcome::Rejected(ValidationError::InvalidContactDetails(_))
    ));
    assert!(intake.order_dirs().is_empty());
}
