//! Read-only access to transfer documents and their ancestor edges.

use async_lock::RwLock;
use async_trait::async_trait;
use custody_core::{
    DocumentId, Error, ForwardingEdge, GroupingEdge, PreviousPackagingEdge, Result, SynthesisEdge,
    TransferDocument,
};
use std::collections::HashMap;

/// Point-in-time reads over the document graph.
///
/// Every lookup of a missing document fails with [`Error::NotFound`];
/// edge queries for a known document with no edges return empty.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load a document by id.
    async fn document(&self, id: &DocumentId) -> Result<TransferDocument>;

    /// The document whose waste was re-shipped as `id`, if any.
    async fn forwarding_predecessor(&self, id: &DocumentId) -> Result<Option<DocumentId>>;

    /// Grouping rows whose aggregate is `id`.
    async fn grouping_edges(&self, id: &DocumentId) -> Result<Vec<GroupingEdge>>;

    /// Contributors synthesized whole into `id`.
    async fn synthesis_contributors(&self, id: &DocumentId) -> Result<Vec<DocumentId>>;

    /// Previous packagings of packaging `id`.
    async fn previous_packagings(&self, id: &DocumentId) -> Result<Vec<DocumentId>>;
}

/// In-memory document store used by tests and the synchronous mode.
#[derive(Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentId, TransferDocument>>,
    forwarding: RwLock<HashMap<DocumentId, DocumentId>>,
    grouping: RwLock<HashMap<DocumentId, Vec<GroupingEdge>>>,
    synthesis: RwLock<HashMap<DocumentId, Vec<DocumentId>>>,
    previous_packagings: RwLock<HashMap<DocumentId, Vec<DocumentId>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document.
    pub async fn put_document(&self, document: TransferDocument) {
        self.documents.write().await.insert(document.id, document);
    }

    /// Record a forwarding edge. A document has at most one
    /// predecessor; a second insert replaces the first.
    pub async fn put_forwarding(&self, edge: ForwardingEdge) {
        self.forwarding
            .write()
            .await
            .insert(edge.document, edge.predecessor);
    }

    /// Record a grouping edge.
    pub async fn put_grouping(&self, edge: GroupingEdge) {
        self.grouping
            .write()
            .await
            .entry(edge.aggregate)
            .or_default()
            .push(edge);
    }

    /// Record a synthesis edge.
    pub async fn put_synthesis(&self, edge: SynthesisEdge) {
        self.synthesis
            .write()
            .await
            .entry(edge.aggregate)
            .or_default()
            .push(edge.contributor);
    }

    /// Record a previous-packaging edge.
    pub async fn put_previous_packaging(&self, edge: PreviousPackagingEdge) {
        self.previous_packagings
            .write()
            .await
            .entry(edge.packaging)
            .or_default()
            .push(edge.previous);
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn document(&self, id: &DocumentId) -> Result<TransferDocument> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(Error::NotFound(*id))
    }

    async fn forwarding_predecessor(&self, id: &DocumentId) -> Result<Option<DocumentId>> {
        Ok(self.forwarding.read().await.get(id).copied())
    }

    async fn grouping_edges(&self, id: &DocumentId) -> Result<Vec<GroupingEdge>> {
        Ok(self.grouping.read().await.get(id).cloned().unwrap_or_default())
    }

    async fn synthesis_contributors(&self, id: &DocumentId) -> Result<Vec<DocumentId>> {
        Ok(self.synthesis.read().await.get(id).cloned().unwrap_or_default())
    }

    async fn previous_packagings(&self, id: &DocumentId) -> Result<Vec<DocumentId>> {
        Ok(self
            .previous_packagings
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custody_core::{DocumentKind, Quantity};

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let store = MemoryDocumentStore::new();
        let id = DocumentId::new();
        assert!(matches!(store.document(&id).await, Err(Error::NotFound(d)) if d == id));
    }

    #[tokio::test]
    async fn edges_are_returned_per_aggregate() {
        let store = MemoryDocumentStore::new();
        let a = TransferDocument::new(DocumentKind::General);
        let g = TransferDocument::new(DocumentKind::General);
        store.put_document(a.clone()).await;
        store.put_document(g.clone()).await;
        store
            .put_grouping(GroupingEdge {
                aggregate: g.id,
                contributor: a.id,
                contributed_quantity: Quantity::from(10),
                redirect: None,
            })
            .await;

        let edges = store.grouping_edges(&g.id).await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].contributor, a.id);
        assert!(store.grouping_edges(&a.id).await.unwrap().is_empty());
    }
}
