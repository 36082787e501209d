//! Order persistence on the local filesystem.
//!
//! Layout:
//!
//! ```text
//! <orders_dir>/
//!   20261019090507_Jane_Doe/
//!     part.step            - uploaded bytes, verbatim
//!     order_details.txt    - OrderRecord::details_text()
//! ```
//!
//! Writes are not transactional: a failure after the design file was written
//! leaves a partial order directory behind.

use std::io;
use std::path::{Path, PathBuf};

use cadia_core::{OrderId, OrderRecord, ValidatedOrder};
use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::instrument;

/// Name of the details record inside each order directory.
pub const DETAILS_FILE_NAME: &str = "order_details.txt";

/// Errors that can occur while writing an order to disk.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create order directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write design file {}: {source}", path.display())]
    WriteFile { path: PathBuf, source: io::Error },

    #[error("failed to write order details {}: {source}", path.display())]
    WriteDetails { path: PathBuf, source: io::Error },
}

/// Result of [`OrderStore::persist`].
#[derive(Debug, Clone)]
pub struct StoredOrder {
    pub record: OrderRecord,
    /// The order directory already existed, so an earlier order with the same
    /// identifier has been overwritten.
    pub collided: bool,
}

/// Append-only store with one directory per order.
#[derive(Debug, Clone)]
pub struct OrderStore {
    root: PathBuf,
}

impl OrderStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the order with the given identifier.
    #[must_use]
    pub fn order_dir(&self, order_id: &OrderId) -> PathBuf {
        self.root.join(order_id.as_str())
    }

    /// Write the design file and the details record of a validated order.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] on the first I/O failure. Nothing written
    /// before the failure is removed.
    #[instrument(skip_all, fields(order_id))]
    pub async fn persist(
        &self,
        order: &ValidatedOrder,
        submitted_at: NaiveDateTime,
    ) -> Result<StoredOrder, PersistError> {
        let order_id = OrderId::new(submitted_at, &order.submission().customer.name);
        tracing::Span::current().record("order_id", order_id.as_str());

        let dir = self.order_dir(&order_id);
        let collided = tokio::fs::try_exists(&dir).await.unwrap_or(false);
        if collided {
            tracing::warn!(
                order_id = %order_id,
                "Order directory already exists; identifier collision, overwriting"
            );
        }

        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| PersistError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let file = order.file();
        let file_path = dir.join(file.file_name());
        tokio::fs::write(&file_path, file.content())
            .await
            .map_err(|source| PersistError::WriteFile {
                path: file_path.clone(),
                source,
            })?;

        let record = OrderRecord::new(order, order_id, submitted_at, file_path);

        let details_path = dir.join(DETAILS_FILE_NAME);
        tokio::fs::write(&details_path, record.details_text())
            .await
            .map_err(|source| PersistError::WriteDetails {
                path: details_path,
                source,
            })?;

        tracing::info!(
            order_id = %record.order_id,
            file = %record.file_name,
            bytes = file.content().len(),
            "Order persisted"
        );

        Ok(StoredOrder { record, collided })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadia_core::{
        Color, Customer, OrderSubmission, Quantity, ShippingAddress, UploadedFile,
        ValidationPolicy, validate,
    };
    use chrono::NaiveDate;

    use super::*;

    fn order(name: &str, bytes: Vec<u8>) -> ValidatedOrder {
        let submission = OrderSubmission {
            customer: Customer {
                name: name.to_string(),
                email: "jane@x.com".to_string(),
                phone: "555-1111".to_string(),
            },
            address: ShippingAddress {
                line1: "1 Main St".to_string(),
                line2: Some("Unit 4".to_string()),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62704".to_string(),
                country: "USA".to_string(),
            },
            color: Color::Green,
            custom_color: None,
            quantity: Quantity::new(2).unwrap(),
            special_instructions: "Sand the supports".to_string(),
            file: UploadedFile::new("bracket.step", bytes),
            terms_accepted: true,
        };
        validate(submission, ValidationPolicy::default()).unwrap()
    }

    fn at(s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(12, 0, s)
            .unwrap()
    }

    #[tokio::test]
    async fn test_persist_writes_file_and_details() {
        let tmp = tempfile::tempdir().unwrap();
        let store = OrderStore::new(tmp.path().join("orders"));

        let stored = store
            .persist(&order("Jane Doe", b"ISO-10303-21;".to_vec()), at(1))
            .await
            .unwrap();

        assert!(!stored.collided);
        assert_eq!(stored.record.order_id.as_str(), "20261019120001_Jane_Doe");

        let dir = tmp.path().join("orders/20261019120001_Jane_Doe");
        assert_eq!(stored.record.file_path, dir.join("bracket.step"));
        assert_eq!(
            std::fs::read(dir.join("bracket.step")).unwrap(),
            b"ISO-10303-21;"
        );

        let details = std::fs::read_to_string(dir.join(DETAILS_FILE_NAME)).unwrap();
        assert_eq!(details, stored.record.details_text());
        assert!(details.contains("Unit 4\n"));
        assert!(details.contains("Color: Green\n"));
        assert!(details.contains("Special Instructions: Sand the supports\n"));
    }

    #[tokio::test]
    async fn test_same_second_same_name_reuses_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = OrderStore::new(tmp.path());

        let first = store.persist(&order("Jane Doe", vec![1; 4]), at(5)).await.unwrap();
        let second = store.persist(&order("Jane Doe", vec![2; 6]), at(5)).await.unwrap();

        assert!(!first.collided);
        assert!(second.collided);
        assert_eq!(first.record.order_id, second.record.order_id);
        // Known limitation: the later upload replaces the earlier one.
        assert_eq!(std::fs::read(&second.record.file_path).unwrap(), vec![2; 6]);
    }

    #[tokio::test]
    async fn test_unwritable_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("orders");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let store = OrderStore::new(&blocker);
        let err = store
            .persist(&order("Jane Doe", vec![1]), at(0))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::CreateDir { .. }));
    }
}
