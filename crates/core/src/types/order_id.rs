//! Order identifiers.
//!
//! An order identifier names the storage namespace of one order:
//! `{YYYYMMDDHHMMSS}_{customer name}` with spaces replaced by underscores.
//!
//! Identifiers only have second granularity. Two orders placed by the same
//! name within the same second get the same identifier and share a
//! namespace; the store reports this as a collision but does not prevent it.

use core::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout of the identifier prefix.
pub const ORDER_ID_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Identifier of a persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Derive the identifier for an order submitted at `submitted_at` by
    /// `customer_name`.
    ///
    /// ```
    /// use cadia_core::OrderId;
    /// use chrono::NaiveDate;
    ///
    /// let at = NaiveDate::from_ymd_opt(2026, 10, 19)
    ///     .and_then(|d| d.and_hms_opt(9, 5, 7))
    ///     .unwrap();
    /// assert_eq!(OrderId::new(at, "Jane Doe").as_str(), "20261019090507_Jane_Doe");
    /// ```
    #[must_use]
    pub fn new(submitted_at: NaiveDateTime, customer_name: &str) -> Self {
        Self(format!(
            "{}_{}",
            submitted_at.format(ORDER_ID_TIMESTAMP_FORMAT),
            sanitize_name(customer_name)
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Spaces become underscores. Path separators are replaced as well so the
/// identifier is always a single directory name.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 4)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_format() {
        let id = OrderId::new(at(14, 30, 2), "Jane Doe");
        assert_eq!(id.as_str(), "20260304143002_Jane_Doe");
    }

    #[test]
    fn test_every_space_replaced() {
        let id = OrderId::new(at(0, 0, 0), "Mary  Ann van Dyke");
        assert_eq!(id.as_str(), "20260304000000_Mary__Ann_van_Dyke");
    }

    #[test]
    fn test_path_separators_replaced() {
        let id = OrderId::new(at(0, 0, 0), "../etc\\passwd");
        assert_eq!(id.as_str(), "20260304000000_.._etc_passwd");
        assert!(!id.as_str().contains('/'));
    }

    #[test]
    fn test_same_second_same_name_collides() {
        assert_eq!(
            OrderId::new(at(8, 0, 1), "Jane Doe"),
            OrderId::new(at(8, 0, 1), "Jane Doe")
        );
        assert_ne!(
            OrderId::new(at(8, 0, 1), "Jane Doe"),
            OrderId::new(at(8, 0, 2), "Jane Doe")
        );
    }
}
