//! Document factories for custody tests
//!
//! Builders and edge helpers that populate a [`MemoryDocumentStore`]
//! with the graph shapes the propagation tests exercise: forwarding
//! chains, grouping splits, synthesis, diamonds and packaging chains.

use chrono::Utc;
use custody_core::{
    DocumentId, DocumentKind, ForwardingEdge, GroupingEdge, PackagingFormation,
    PreviousPackagingEdge, Quantity, SynthesisEdge, TransferDocument,
};
use custody_store::MemoryDocumentStore;

/// Chainable factory for one transfer document.
pub struct DocumentBuilder {
    document: TransferDocument,
}

impl DocumentBuilder {
    /// Start a document of the given kind.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            document: TransferDocument::new(kind),
        }
    }

    /// Set the received quantity (accepted weight for packagings).
    pub fn received(mut self, quantity: impl Into<Quantity>) -> Self {
        self.document.received_quantity = Some(quantity.into());
        self
    }

    /// Record a signed destination operation.
    pub fn operation(mut self, code: &str) -> Self {
        self.document.operation_code = Some(code.to_string());
        self.document.operation_signed_at = Some(Utc::now());
        self
    }

    /// Record an operation code without a signature timestamp.
    pub fn unsigned_operation(mut self, code: &str) -> Self {
        self.document.operation_code = Some(code.to_string());
        self.document.operation_signed_at = None;
        self
    }

    /// Flag the administrative traceability exemption.
    pub fn no_traceability(mut self) -> Self {
        self.document.no_traceability = true;
        self
    }

    /// Set how a packaging's shipment was formed.
    pub fn formation(mut self, formation: PackagingFormation) -> Self {
        self.document.packaging_formation = Some(formation);
        self
    }

    /// Insert into the store and return the built document.
    pub async fn insert(self, store: &MemoryDocumentStore) -> TransferDocument {
        store.put_document(self.document.clone()).await;
        self.document
    }
}

/// Link `suite` as the re-shipment of `initial` after temporary
/// storage.
pub async fn forward(
    store: &MemoryDocumentStore,
    initial: &TransferDocument,
    suite: &TransferDocument,
) {
    store
        .put_forwarding(ForwardingEdge {
            document: suite.id,
            predecessor: initial.id,
        })
        .await;
}

/// Group `contributor` into `aggregate` with the recorded
/// sub-quantity.
pub async fn group(
    store: &MemoryDocumentStore,
    aggregate: &TransferDocument,
    contributor: &TransferDocument,
    quantity: impl Into<Quantity>,
) {
    store
        .put_grouping(GroupingEdge {
            aggregate: aggregate.id,
            contributor: contributor.id,
            contributed_quantity: quantity.into(),
            redirect: None,
        })
        .await;
}

/// Group with a redirect: the contributor was later forwarded into
/// `redirect`, the live end of the chain.
pub async fn group_redirected(
    store: &MemoryDocumentStore,
    aggregate: &TransferDocument,
    contributor: &TransferDocument,
    quantity: impl Into<Quantity>,
    redirect: DocumentId,
) {
    store
        .put_grouping(GroupingEdge {
            aggregate: aggregate.id,
            contributor: contributor.id,
            contributed_quantity: quantity.into(),
            redirect: Some(redirect),
        })
        .await;
}

/// Absorb `contributor` whole into the synthesis document.
pub async fn synthesize(
    store: &MemoryDocumentStore,
    aggregate: &TransferDocument,
    contributor: &TransferDocument,
) {
    store
        .put_synthesis(SynthesisEdge {
            aggregate: aggregate.id,
            contributor: contributor.id,
        })
        .await;
}

/// Chain `previous` as a previous packaging of `packaging`.
pub async fn previous_packaging(
    store: &MemoryDocumentStore,
    packaging: &TransferDocument,
    previous: &TransferDocument,
) {
    store
        .put_previous_packaging(PreviousPackagingEdge {
            packaging: packaging.id,
            previous: previous.id,
        })
        .await;
}
