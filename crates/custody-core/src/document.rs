//! The transfer-document model and the relations between documents.
//!
//! Documents and edges are created and mutated entirely by the
//! signature and revision subsystems; this workspace only reads
//! committed values.

use crate::types::{DocumentId, DocumentKind, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a packaging's shipment was formed from its previous packagings.
///
/// Only meaningful for [`DocumentKind::Packaging`] documents; drives
/// which accepted weight is attributed to the previous packaging when
/// a final operation propagates backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackagingFormation {
    /// Re-shipped as-is after temporary storage
    Forwarded,
    /// Grouped with other packagings into one shipment
    Grouped,
    /// Contents repackaged into new containers
    Repackaged,
}

/// A waste-transfer document: one shipment/treatment step.
///
/// `received_quantity` doubles as the accepted weight for
/// `Packaging` documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferDocument {
    /// Document identity
    pub id: DocumentId,
    /// Document family
    pub kind: DocumentKind,
    /// Quantity accepted by the destination, in kilograms
    pub received_quantity: Option<Quantity>,
    /// Treatment code recorded by the destination
    pub operation_code: Option<String>,
    /// When the destination operation was signed
    pub operation_signed_at: Option<DateTime<Utc>>,
    /// Authorized administrative break in the traceability chain
    pub no_traceability: bool,
    /// Shipment formation, `Packaging` documents only
    pub packaging_formation: Option<PackagingFormation>,
}

impl TransferDocument {
    /// Create a bare document of the given kind.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            id: DocumentId::new(),
            kind,
            received_quantity: None,
            operation_code: None,
            operation_signed_at: None,
            no_traceability: false,
            packaging_formation: None,
        }
    }

    /// Whether the destination operation counts as terminal for
    /// propagation: either the code is a final treatment code, or the
    /// document carries a `no_traceability` exemption.
    pub fn is_terminal_for_propagation(&self) -> bool {
        self.no_traceability
            || self
                .operation_code
                .as_deref()
                .is_some_and(crate::codes::is_final_operation_code)
    }
}

/// 1:1 relation: a document's waste was temporarily stored and later
/// re-shipped as a new document. At most one per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardingEdge {
    /// The re-shipment document
    pub document: DocumentId,
    /// The document whose waste was re-shipped
    pub predecessor: DocumentId,
}

/// N:1 relation: a contributor document aggregated into a grouping
/// document, with the sub-quantity recorded at grouping time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingEdge {
    /// The aggregate document
    pub aggregate: DocumentId,
    /// The contributor document
    pub contributor: DocumentId,
    /// Historical fact: quantity the contributor put into the aggregate
    pub contributed_quantity: Quantity,
    /// If the contributor was itself later forwarded, the id of the
    /// newer document at the live end of the chain
    pub redirect: Option<DocumentId>,
}

/// N:1 relation: a contributor document absorbed whole into a
/// synthesis document. The contribution is the contributor's own
/// received quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisEdge {
    /// The synthesis document
    pub aggregate: DocumentId,
    /// The contributor document
    pub contributor: DocumentId,
}

/// Chain relation between packagings of successive shipments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousPackagingEdge {
    /// The current packaging
    pub packaging: DocumentId,
    /// The packaging it descends from
    pub previous: DocumentId,
}
