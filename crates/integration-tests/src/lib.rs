//! Integration tests for the CADIA order intake service.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cadia-integration-tests
//! ```
//!
//! The tests need no running services. Orders are written to a temporary
//! directory and the SMTP relay points at a closed local port, so every
//! notification fails fast and the best-effort path is exercised.
//!
//! # Test Categories
//!
//! - `order_workflow` - validation, persistence and notification end to end
//! - `order_routes` - the HTTP surface, driven with hand-built multipart bodies

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use cadia_core::{Color, Customer, OrderSubmission, Quantity, ShippingAddress, UploadedFile};
use cadia_intake::config::IntakeConfig;
use cadia_intake::state::AppState;
use tempfile::TempDir;

/// Boundary used by [`MultipartBody`].
pub const BOUNDARY: &str = "cadia-test-boundary";

/// An intake service wired to a throwaway orders directory.
pub struct TestIntake {
    dir: TempDir,
    pub state: AppState,
}

impl TestIntake {
    /// Default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the state cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_env(&[])
    }

    /// Configuration with extra or overridden environment variables.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    #[must_use]
    pub fn with_env(overrides: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let orders_dir = dir.path().join("orders");
        let static_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../intake/static");

        let mut env: HashMap<String, String> = [
            ("SMTP_HOST", "127.0.0.1"),
            ("SMTP_PORT", "1"),
            ("SMTP_TIMEOUT_SECS", "2"),
            ("SMTP_SENDER_EMAIL", "orders@cadia3d.com"),
            ("SMTP_PASSWORD", "qk7Zp2vW9mRt4xLa"),
            ("ORDER_RECEIVER_EMAIL", "shop@cadia3d.com"),
            ("COMPANY_NAME", "CADIA 3D Printing"),
            ("SUPPORT_EMAIL", "support@cadia3d.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        env.insert(
            "INTAKE_ORDERS_DIR".to_string(),
            orders_dir.display().to_string(),
        );
        env.insert(
            "INTAKE_STATIC_DIR".to_string(),
            static_dir.display().to_string(),
        );
        for (key, value) in overrides {
            env.insert((*key).to_string(), (*value).to_string());
        }

        let config = IntakeConfig::from_lookup(|key| env.get(key).cloned())
            .expect("Invalid test configuration");
        let state = AppState::new(config).expect("Failed to build state");

        Self { dir, state }
    }

    /// Root directory orders are written to.
    #[must_use]
    pub fn orders_dir(&self) -> PathBuf {
        self.dir.path().join("orders")
    }

    /// Every order directory written so far, sorted by name.
    #[must_use]
    pub fn order_dirs(&self) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.orders_dir()) else {
            return Vec::new();
        };
        let mut dirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }
}

impl Default for TestIntake {
    fn default() -> Self {
        Self::new()
    }
}

/// A complete, valid order from Jane Doe: 3 blue copies of `part.step`.
///
/// # Panics
///
/// Never; the fixed values are valid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn jane_doe_submission() -> OrderSubmission {
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
        file: UploadedFile::new("part.step", b"0123456789".to_vec()),
        terms_accepted: true,
    }
}

/// The order form fields of [`jane_doe_submission`], as a browser posts them.
#[must_use]
pub fn jane_doe_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jane Doe"),
        ("email", "jane@x.com"),
        ("phone", "555-1111"),
        ("address_line1", "1 Main St"),
        ("address_line2", ""),
        ("city", "Springfield"),
        ("state", "IL"),
        ("zip", "62704"),
        ("country", "USA"),
        ("color", "Blue"),
        ("custom_color", ""),
        ("quantity", "3"),
        ("special_instructions", ""),
        ("terms", "on"),
    ]
}

/// Minimal `multipart/form-data` body builder.
#[derive(Debug, Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    #[must_use]
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    /// Append every `(name, value)` pair as a text field.
    #[must_use]
    pub fn fields(self, fields: &[(&str, &str)]) -> Self {
        fields
            .iter()
            .fold(self, |body, (name, value)| body.text(name, value))
    }

    /// Append a file field.
    #[must_use]
    pub fn file(mut self, name: &str, file_name: &str, content: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(content);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    /// Close the body.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }

    /// `Content-Type` header value matching the boundary.
    #[must_use]
    pub fn content_type() -> String {
        format!("multipart/form-data; boundary={BOUNDARY}")
    }
}
