//! The propagation job message.

use crate::document::TransferDocument;
use crate::types::{DocumentId, DocumentKind, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One unit of propagation work: attribute a share of a final
/// operation to one document of the ancestor graph.
///
/// Jobs are messages, not persisted state; the durable queue carries
/// them as JSON. One job is consumed and one follow-up job is emitted
/// per graph edge traversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationJob {
    /// Document family the job walks
    pub kind: DocumentKind,
    /// The document currently being attributed to
    pub initial: DocumentId,
    /// The document on which the final operation was signed
    pub r#final: DocumentId,
    /// The final operation's treatment code
    pub operation_code: String,
    /// Whether the chain ends on an administrative exemption rather
    /// than a true final code
    pub no_traceability: bool,
    /// Quantity basis for this step; `None` on the seed job, where the
    /// initial document's own received quantity applies
    pub quantity: Option<Quantity>,
    /// Share of the quantity basis attributable to the final
    /// operation, compounded multiplicatively along the walk
    pub fraction: Decimal,
}

impl PropagationJob {
    /// Build the seed job for a document whose destination operation
    /// was just signed: the document is both initial and final, the
    /// whole received quantity is attributable.
    pub fn seed(document: &TransferDocument) -> Self {
        Self {
            kind: document.kind,
            initial: document.id,
            r#final: document.id,
            operation_code: document.operation_code.clone().unwrap_or_default(),
            no_traceability: document.no_traceability,
            quantity: None,
            fraction: Decimal::ONE,
        }
    }

    /// Follow-up job for one ancestor edge.
    pub fn follow_up(&self, initial: DocumentId, quantity: Quantity, fraction: Decimal) -> Self {
        Self {
            kind: self.kind,
            initial,
            r#final: self.r#final,
            operation_code: self.operation_code.clone(),
            no_traceability: self.no_traceability,
            quantity: Some(quantity),
            fraction,
        }
    }
}
