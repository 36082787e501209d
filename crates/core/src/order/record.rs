//! Persisted order records.

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::order::submission::{Customer, ShippingAddress};
use crate::order::validation::ValidatedOrder;
use crate::types::{OrderId, Quantity};

/// Layout of the submission timestamp in the details record and emails.
pub const DETAILS_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A stored order. Created once from a [`ValidatedOrder`] and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub submitted_at: NaiveDateTime,
    pub customer: Customer,
    pub address: ShippingAddress,
    /// Resolved color; never the literal `Custom`.
    pub color: String,
    pub quantity: Quantity,
    pub special_instructions: String,
    /// Original name of the uploaded design file.
    pub file_name: String,
    /// Where the design file was written.
    pub file_path: PathBuf,
}

impl OrderRecord {
    #[must_use]
    pub fn new(
        order: &ValidatedOrder,
        order_id: OrderId,
        submitted_at: NaiveDateTime,
        file_path: PathBuf,
    ) -> Self {
        let submission = order.submission();
        Self {
            order_id,
            submitted_at,
            customer: submission.customer.clone(),
            address: submission.address.clone(),
            color: order.resolved_color().to_string(),
            quantity: submission.quantity,
            special_instructions: submission.special_instructions.clone(),
            file_name: order.file().file_name().to_string(),
            file_path,
        }
    }

    /// Submission time formatted for people.
    #[must_use]
    pub fn submitted_at_display(&self) -> String {
        self.submitted_at.format(DETAILS_DATE_FORMAT).to_string()
    }

    /// Special instructions, if the customer wrote any.
    #[must_use]
    pub fn instructions(&self) -> Option<&str> {
        Some(self.special_instructions.as_str()).filter(|s| !s.trim().is_empty())
    }

    /// The plain-text order details file stored beside the design file.
    #[must_use]
    pub fn details_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = writeln!(out, "Order ID: {}", self.order_id);
        let _ = writeln!(out, "Date: {}", self.submitted_at_display());
        out.push('\n');
        let _ = writeln!(out, "Name: {}", self.customer.name);
        let _ = writeln!(out, "Email: {}", self.customer.email);
        let _ = writeln!(out, "Phone: {}", self.customer.phone);
        out.push('\n');
        out.push_str("Shipping Address:\n");
        for line in self.address.lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str("Order Details:\n");
        let _ = writeln!(out, "Color: {}", self.color);
        let _ = writeln!(out, "Quantity: {}", self.quantity);
        let _ = writeln!(out, "Special Instructions: {}", self.special_instructions);
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::order::submission::{OrderSubmission, UploadedFile};
    use crate::order::validation::{ValidationPolicy, validate};
    use crate::types::Color;

    fn validated(line2: Option<&str>, instructions: &str) -> ValidatedOrder {
        let submission = OrderSubmission {
            customer: Customer {
                name: "Jane Doe".to_string(),
                email: "jane@x.com".to_string(),
                phone: "555-1111".to_string(),
            },
            address: ShippingAddress {
                line1: "1 Main St".to_string(),
                line2: line2.map(String::from),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62704".to_string(),
                country: "USA".to_string(),
            },
            color: Color::Custom,
            custom_color: Some("Sunset Orange".to_string()),
            quantity: Quantity::new(3).unwrap(),
            special_instructions: instructions.to_string(),
            file: UploadedFile::new("part.step", vec![0; 10]),
            terms_accepted: true,
        };
        validate(submission, ValidationPolicy::default()).unwrap()
    }

    fn record(line2: Option<&str>, instructions: &str) -> OrderRecord {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        let order = validated(line2, instructions);
        let id = OrderId::new(at, &order.submission().customer.name);
        OrderRecord::new(&order, id, at, PathBuf::from("orders/x/part.step"))
    }

    #[test]
    fn test_details_layout() {
        let text = record(None, "Infill 40%").details_text();
        assert_eq!(
            text,
            "Order ID: 20261019090507_Jane_Doe\n\
             Date: 2026-10-19 09:05:07\n\
             \n\
             Name: Jane Doe\n\
             Email: jane@x.com\n\
             Phone: 555-1111\n\
             \n\
             Shipping Address:\n\
             1 Main St\n\
             Springfield, IL 62704\n\
             USA\n\
             \n\
             Order Details:\n\
             Color: Sunset Orange\n\
             Quantity: 3\n\
             Special Instructions: Infill 40%\n"
        );
    }

    #[test]
    fn test_details_include_line2_when_present() {
        let text = record(Some("Suite 200"), "").details_text();
        assert!(text.contains("1 Main St\nSuite 200\nSpringfield, IL 62704\n"));
    }

    #[test]
    fn test_record_uses_resolved_color() {
        let record = record(None, "");
        assert_eq!(record.color, "Sunset Orange");
        assert_eq!(record.file_name, "part.step");
        assert_eq!(record.instructions(), None);
    }
}
