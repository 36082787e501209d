//! Raw order form input.

use std::path::Path;

use crate::types::{Color, Quantity};

/// Contact details of the person placing the order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Where the printed parts are shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingAddress {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl ShippingAddress {
    /// Postal layout of the address, one entry per printed line.
    ///
    /// The second address line is included only when it is non-empty.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(4);
        lines.push(self.line1.clone());
        if let Some(line2) = self.line2.as_deref().filter(|l| !l.is_empty()) {
            lines.push(line2.to_string());
        }
        lines.push(format!("{}, {} {}", self.city, self.state, self.zip));
        lines.push(self.country.clone());
        lines
    }
}

/// An uploaded design file.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    file_name: String,
    content: Vec<u8>,
}

impl UploadedFile {
    /// Wrap an upload. Any directory components the client sent with the
    /// filename are dropped; `None` if nothing usable remains.
    #[must_use]
    pub fn new(file_name: &str, content: Vec<u8>) -> Option<Self> {
        let base = Path::new(file_name.trim())
            .file_name()?
            .to_str()
            .filter(|name| !name.is_empty())?;
        // Browsers on Windows may send the full client path.
        let base = base.rsplit('\\').next().unwrap_or(base);
        if base.is_empty() || base == ".." || base == "." {
            return None;
        }
        Some(Self {
            file_name: base.to_string(),
            content,
        })
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Lower-cased extension of the filename, if any.
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.content.len())
            .finish()
    }
}

/// Everything one post of the order form carries.
///
/// Owned by the request that produced it and dropped once the workflow has
/// finished with it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSubmission {
    pub customer: Customer,
    pub address: ShippingAddress,
    pub color: Color,
    /// Free-text color, only consulted when `color` is [`Color::Custom`].
    pub custom_color: Option<String>,
    pub quantity: Quantity,
    pub special_instructions: String,
    pub file: Option<UploadedFile>,
    pub terms_accepted: bool,
}
