//! Resolver for general waste transfer documents.

use super::{forwarding_and_grouping_edges, AncestorEdge, AncestorResolver};
use async_trait::async_trait;
use custody_core::{DocumentId, Quantity, Result};
use custody_store::DocumentStore;
use std::sync::Arc;

/// Ancestry of general waste documents: an optional temporary-storage
/// forwarding predecessor plus grouping contributors.
///
/// A grouped contributor that was itself temp-stored and re-shipped
/// carries a redirect on its grouping row; the resolver follows it so
/// propagation continues from the live end of the chain.
pub struct GeneralResolver {
    store: Arc<dyn DocumentStore>,
}

impl GeneralResolver {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AncestorResolver for GeneralResolver {
    async fn received_quantity(&self, id: &DocumentId) -> Result<Option<Quantity>> {
        Ok(self.store.document(id).await?.received_quantity)
    }

    async fn ancestor_edges(&self, id: &DocumentId) -> Result<Vec<AncestorEdge>> {
        forwarding_and_grouping_edges(&self.store, id).await
    }
}
