//! Order submission workflow.
//!
//! ```text
//! Validating -> Rejected
//!            -> Persisting -> PersistFailed
//!                          -> Persisted -> Notifying (best-effort) -> Done
//! ```
//!
//! Validation errors stop before any write. Persistence errors stop before
//! any notification. Notification errors are downgraded to a warning on an
//! otherwise successful outcome; the stored order is never touched again.

use axum::http::StatusCode;
use cadia_core::{OrderSubmission, ValidationError, ValidationPolicy, advisories, validate};
use chrono::NaiveDateTime;
use tracing::instrument;

use crate::services::email::{NotificationError, Notifier};
use crate::services::storage::{OrderStore, PersistError, StoredOrder};

/// What happened to the notification of a persisted order.
#[derive(Debug)]
pub enum NotificationStatus {
    Sent { to: String },
    Failed(NotificationError),
}

/// Terminal state of one submission.
#[derive(Debug)]
pub enum SubmissionOutcome {
    Rejected(ValidationError),
    PersistFailed(PersistError),
    Done {
        stored: StoredOrder,
        notification: NotificationStatus,
    },
}

impl SubmissionOutcome {
    /// HTTP status the feedback page is served with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PersistFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Done { .. } => StatusCode::OK,
        }
    }

    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}

/// Run one submission through validation, persistence and notification.
#[instrument(skip_all, fields(customer = %submission.customer.name))]
pub async fn submit_order<N: Notifier>(
    store: &OrderStore,
    notifier: &N,
    submission: OrderSubmission,
    policy: ValidationPolicy,
    submitted_at: NaiveDateTime,
) -> SubmissionOutcome {
    if !policy.strict_contact {
        for advisory in advisories(&submission) {
            tracing::warn!(%advisory, "Accepting order with questionable contact details");
        }
    }

    let order = match validate(submission, policy) {
        Ok(order) => order,
        Err(err) => {
            tracing::info!(error = %err, "Order rejected");
            return SubmissionOutcome::Rejected(err);
        }
    };

    let stored = match store.persist(&order, submitted_at).await {
        Ok(stored) => stored,
        Err(err) => {
            let event_id = sentry::capture_error(&err);
            tracing::error!(
                error = %err,
                sentry_event_id = %event_id,
                "Failed to persist order"
            );
            return SubmissionOutcome::PersistFailed(err);
        }
    };

    let notification = match notifier.notify(&stored.record).await {
        Ok(()) => NotificationStatus::Sent {
            to: notifier.recipient().to_string(),
        },
        Err(err) => {
            tracing::warn!(
                order_id = %stored.record.order_id,
                error = %err,
                "Order persisted but notification failed"
            );
            NotificationStatus::Failed(err)
        }
    };

    SubmissionOutcome::Done {
        stored,
        notification,
    }
}
