//! Order notification email.
//!
//! Uses SMTP via lettre with an Askama plain-text template. Each notification
//! opens its own STARTTLS connection, authenticates as the sender, sends one
//! message and closes the connection. There is no retry.

use std::future::Future;

use askama::Template;
use cadia_core::OrderRecord;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{
        Attachment, Mailbox, MultiPart, SinglePart,
        header::{ContentType, ContentTypeErr},
    },
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::instrument;

use crate::config::SmtpConfig;

/// Plain text body of the new-order email.
#[derive(Template)]
#[template(path = "email/order_notification.txt")]
struct OrderNotificationText<'a> {
    record: &'a OrderRecord,
    submitted_at: String,
    address_lines: Vec<String>,
}

/// Errors that can occur when sending an order notification.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// SMTP transport error (connect, STARTTLS, auth, send, timeout).
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Invalid MIME content type.
    #[error("Invalid content type: {0}")]
    ContentType(#[from] ContentTypeErr),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    /// The persisted design file could not be read back for attaching.
    #[error("Failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        source: std::io::Error,
    },
}

/// Anything that can announce a persisted order.
pub trait Notifier: Send + Sync {
    /// Send the notification for `record`. A single attempt.
    fn notify(
        &self,
        record: &OrderRecord,
    ) -> impl Future<Output = Result<(), NotificationError>> + Send;

    /// Human-readable destination, shown to the customer on success.
    fn recipient(&self) -> &str;
}

/// Subject, body and attachment of one order notification.
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
    pub attachment_name: String,
    pub attachment: Vec<u8>,
}

impl NotificationMessage {
    /// Project an order record into email form. `attachment` must be the
    /// bytes read back from the record's stored file.
    ///
    /// # Errors
    ///
    /// Returns error if the body template fails to render.
    pub fn compose(record: &OrderRecord, attachment: Vec<u8>) -> Result<Self, NotificationError> {
        let body = OrderNotificationText {
            record,
            submitted_at: record.submitted_at_display(),
            address_lines: record.address.lines(),
        }
        .render()?;

        Ok(Self {
            subject: format!("New 3D Printing Order - {}", record.order_id),
            body,
            attachment_name: record.file_name.clone(),
            attachment,
        })
    }

    /// Build the MIME message: a plain-text part followed by the attachment.
    ///
    /// # Errors
    ///
    /// Returns error if an address does not parse or the message fails to build.
    pub fn into_message(self, from: &str, to: &str) -> Result<Message, NotificationError> {
        let from: Mailbox = from
            .parse()
            .map_err(|_| NotificationError::InvalidAddress(from.to_string()))?;
        let to: Mailbox = to
            .parse()
            .map_err(|_| NotificationError::InvalidAddress(to.to_string()))?;

        let attachment = Attachment::new(self.attachment_name).body(
            self.attachment,
            ContentType::parse("application/octet-stream")?,
        );

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(self.body),
                    )
                    .singlepart(attachment),
            )?;

        Ok(message)
    }
}

/// SMTP notifier for new orders.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    to_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// No connection is made until the first notification.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS parameters for the relay cannot be built.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.sender.as_str().to_string(),
            config.password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(credentials)
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            mailer,
            from_address: config.sender.as_str().to_string(),
            to_address: config.receiver.as_str().to_string(),
        })
    }
}

impl Notifier for EmailService {
    #[instrument(skip_all, fields(order_id = %record.order_id, to = %self.to_address))]
    async fn notify(&self, record: &OrderRecord) -> Result<(), NotificationError> {
        let attachment = tokio::fs::read(&record.file_path).await.map_err(|source| {
            NotificationError::Attachment {
                path: record.file_path.display().to_string(),
                source,
            }
        })?;

        let message = NotificationMessage::compose(record, attachment)?
            .into_message(&self.from_address, &self.to_address)?;

        self.mailer.send(message).await?;

        tracing::info!("Order notification sent");
        Ok(())
    }

    fn recipient(&self) -> &str {
        &self.to_address
    }
}
