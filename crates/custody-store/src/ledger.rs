//! The final-operation ledger: one accumulating row per
//! (initial document, final document, kind).

use async_lock::Mutex;
use async_trait::async_trait;
use custody_core::{DocumentId, DocumentKind, Quantity, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One ledger row: the share of a final operation attributable to an
/// ancestor document.
///
/// `quantity` equals the sum of every contribution that reached this
/// (initial, final) pair; it never decreases except by full deletion
/// on revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalOperationRecord {
    /// The ancestor document being attributed to
    pub initial: DocumentId,
    /// The document carrying the final operation
    pub r#final: DocumentId,
    /// Document family
    pub kind: DocumentKind,
    /// Treatment code of the final operation
    pub operation_code: String,
    /// Whether the chain ended on an administrative exemption
    pub no_traceability: bool,
    /// Accumulated attributable quantity
    pub quantity: Quantity,
}

/// Arguments of one ledger upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerUpsert {
    /// The ancestor document being attributed to
    pub initial: DocumentId,
    /// The document carrying the final operation
    pub r#final: DocumentId,
    /// Document family
    pub kind: DocumentKind,
    /// Treatment code of the final operation
    pub operation_code: String,
    /// Whether the chain ended on an administrative exemption
    pub no_traceability: bool,
    /// Contribution of this propagation step
    pub quantity: Quantity,
}

/// The accumulating final-operation store.
///
/// The increment must be additive, not overwrite: diamond-shaped
/// graphs reach the same (initial, final) pair over several paths and
/// every path's contribution counts. It must also be atomic at the
/// storage layer, since concurrent propagation branches write to the
/// same row with no ordering guarantee.
#[async_trait]
pub trait FinalOperationLedger: Send + Sync {
    /// Create the row with `upsert.quantity`, or add it to the stored
    /// quantity if the row exists.
    async fn upsert_increment(&self, upsert: LedgerUpsert) -> Result<()>;

    /// Delete every row for a final document, used when a revision
    /// turns a previously-final code back into a non-final one.
    /// Returns the number of rows removed.
    async fn delete_all_for_final(&self, r#final: &DocumentId, kind: DocumentKind) -> Result<u64>;

    /// Cascade: delete every row referencing a document on either
    /// side, used when the document itself is deleted.
    async fn delete_all_for_document(&self, id: &DocumentId) -> Result<u64>;

    /// Rows attributing final operations to `initial`, the read side
    /// consumed by registry exports.
    async fn records_for_initial(&self, initial: &DocumentId) -> Result<Vec<FinalOperationRecord>>;
}

type LedgerKey = (DocumentId, DocumentId, DocumentKind);

/// In-memory ledger. One lock section per upsert keeps the
/// read-and-add atomic.
#[derive(Default)]
pub struct MemoryLedger {
    rows: Mutex<HashMap<LedgerKey, FinalOperationRecord>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single row, test helper.
    pub async fn record(
        &self,
        initial: &DocumentId,
        r#final: &DocumentId,
        kind: DocumentKind,
    ) -> Option<FinalOperationRecord> {
        self.rows
            .lock()
            .await
            .get(&(*initial, *r#final, kind))
            .cloned()
    }
}

#[async_trait]
impl FinalOperationLedger for MemoryLedger {
    async fn upsert_increment(&self, upsert: LedgerUpsert) -> Result<()> {
        let key = (upsert.initial, upsert.r#final, upsert.kind);
        let mut rows = self.rows.lock().await;
        match rows.get_mut(&key) {
            Some(row) => {
                row.quantity = row.quantity + upsert.quantity;
                tracing::debug!(
                    initial = %upsert.initial,
                    r#final = %upsert.r#final,
                    quantity = %row.quantity,
                    "Incremented final operation row"
                );
            }
            None => {
                rows.insert(
                    key,
                    FinalOperationRecord {
                        initial: upsert.initial,
                        r#final: upsert.r#final,
                        kind: upsert.kind,
                        operation_code: upsert.operation_code,
                        no_traceability: upsert.no_traceability,
                        quantity: upsert.quantity,
                    },
                );
            }
        }
        Ok(())
    }

    async fn delete_all_for_final(&self, r#final: &DocumentId, kind: DocumentKind) -> Result<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|(_, f, k), _| !(f == r#final && *k == kind));
        Ok((before - rows.len()) as u64)
    }

    async fn delete_all_for_document(&self, id: &DocumentId) -> Result<u64> {
        let mut rows = self.rows.lock().await;
        let before = rows.len();
        rows.retain(|(i, f, _), _| i != id && f != id);
        Ok((before - rows.len()) as u64)
    }

    async fn records_for_initial(&self, initial: &DocumentId) -> Result<Vec<FinalOperationRecord>> {
        let rows = self.rows.lock().await;
        let mut records: Vec<_> = rows
            .values()
            .filter(|row| row.initial == *initial)
            .cloned()
            .collect();
        records.sort_by_key(|row| *row.r#final.as_uuid());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn upsert(initial: DocumentId, r#final: DocumentId, quantity: Quantity) -> LedgerUpsert {
        LedgerUpsert {
            initial,
            r#final,
            kind: DocumentKind::General,
            operation_code: "R 1".to_string(),
            no_traceability: false,
            quantity,
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_increments() {
        let ledger = MemoryLedger::new();
        let (a, f) = (DocumentId::new(), DocumentId::new());

        ledger
            .upsert_increment(upsert(a, f, Quantity::new(dec!(3.5))))
            .await
            .unwrap();
        ledger
            .upsert_increment(upsert(a, f, Quantity::new(dec!(6.5))))
            .await
            .unwrap();

        let row = ledger.record(&a, &f, DocumentKind::General).await.unwrap();
        assert_eq!(row.quantity, Quantity::from(10));
        assert_eq!(
            ledger.records_for_initial(&a).await.unwrap().len(),
            1,
            "exactly one row per (initial, final, kind)"
        );
    }

    #[tokio::test]
    async fn delete_all_for_final_removes_only_that_final() {
        let ledger = MemoryLedger::new();
        let (a, f1, f2) = (DocumentId::new(), DocumentId::new(), DocumentId::new());
        ledger
            .upsert_increment(upsert(a, f1, Quantity::from(10)))
            .await
            .unwrap();
        ledger
            .upsert_increment(upsert(a, f2, Quantity::from(20)))
            .await
            .unwrap();

        let removed = ledger
            .delete_all_for_final(&f1, DocumentKind::General)
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(ledger.record(&a, &f1, DocumentKind::General).await.is_none());
        assert!(ledger.record(&a, &f2, DocumentKind::General).await.is_some());
    }

    #[tokio::test]
    async fn document_deletion_cascades_both_sides() {
        let ledger = MemoryLedger::new();
        let (a, b, f) = (DocumentId::new(), DocumentId::new(), DocumentId::new());
        ledger
            .upsert_increment(upsert(a, f, Quantity::from(1)))
            .await
            .unwrap();
        ledger
            .upsert_increment(upsert(b, f, Quantity::from(2)))
            .await
            .unwrap();
        ledger
            .upsert_increment(upsert(f, a, Quantity::from(3)))
            .await
            .unwrap();

        let removed = ledger.delete_all_for_document(&a).await.unwrap();
        assert_eq!(removed, 2);
        assert!(ledger.record(&b, &f, DocumentKind::General).await.is_some());
    }
}
