//! Resolver for construction and demolition waste documents.

use super::{forwarding_and_grouping_edges, AncestorEdge, AncestorResolver};
use async_trait::async_trait;
use custody_core::{DocumentId, Quantity, Result};
use custody_store::DocumentStore;
use std::sync::Arc;

/// Ancestry of construction waste documents. Same graph shape as the
/// general kind, kept separate because the two families live in
/// separate tables and evolve independently.
pub struct ConstructionResolver {
    store: Arc<dyn DocumentStore>,
}

impl ConstructionResolver {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AncestorResolver for ConstructionResolver {
    async fn received_quantity(&self, id: &DocumentId) -> Result<Option<Quantity>> {
        Ok(self.store.document(id).await?.received_quantity)
    }

    async fn ancestor_edges(&self, id: &DocumentId) -> Result<Vec<AncestorEdge>> {
        forwarding_and_grouping_edges(&self.store, id).await
    }
}
