//! Application state shared across handlers.

use std::sync::Arc;

use cadia_core::ValidationPolicy;
use lettre::transport::smtp::Error as SmtpError;

use crate::config::IntakeConfig;
use crate::feedback::FeedbackRenderer;
use crate::services::{EmailService, OrderStore};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("invalid SMTP configuration: {0}")]
    Smtp(#[from] SmtpError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration loaded at start-up
/// and the services built from it; nothing in here changes per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: IntakeConfig,
    store: OrderStore,
    notifier: EmailService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be configured.
    pub fn new(config: IntakeConfig) -> Result<Self, StateError> {
        let store = OrderStore::new(config.orders_dir.clone());
        let notifier = EmailService::new(&config.smtp)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                notifier,
            }),
        })
    }

    /// Get a reference to the intake configuration.
    #[must_use]
    pub fn config(&self) -> &IntakeConfig {
        &self.inner.config
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn store(&self) -> &OrderStore {
        &self.inner.store
    }

    /// Get a reference to the order notifier.
    #[must_use]
    pub fn notifier(&self) -> &EmailService {
        &self.inner.notifier
    }

    /// Validation settings derived from the configuration.
    #[must_use]
    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            strict_contact: self.inner.config.strict_contact_validation,
        }
    }

    /// Feedback renderer bound to the configured branding.
    #[must_use]
    pub fn feedback(&self) -> FeedbackRenderer<'_> {
        FeedbackRenderer::new(&self.inner.config.branding)
    }
}
