//! Resolver for clinical/infectious waste documents.

use super::{live_contributor, AncestorEdge, AncestorResolver};
use async_trait::async_trait;
use custody_core::{DocumentId, Quantity, Result};
use custody_store::DocumentStore;
use std::sync::Arc;

/// Ancestry of clinical waste documents: grouping rows with recorded
/// sub-quantities, plus synthesis rows where a contributor was
/// absorbed whole and its own received quantity is the contribution.
pub struct ClinicalResolver {
    store: Arc<dyn DocumentStore>,
}

impl ClinicalResolver {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AncestorResolver for ClinicalResolver {
    async fn received_quantity(&self, id: &DocumentId) -> Result<Option<Quantity>> {
        Ok(self.store.document(id).await?.received_quantity)
    }

    async fn ancestor_edges(&self, id: &DocumentId) -> Result<Vec<AncestorEdge>> {
        let mut edges = Vec::new();

        for grouping in self.store.grouping_edges(id).await? {
            edges.push(AncestorEdge::Group {
                ancestor: live_contributor(&grouping),
                contributed: grouping.contributed_quantity,
            });
        }

        for contributor in self.store.synthesis_contributors(id).await? {
            let document = self.store.document(&contributor).await?;
            let Some(contributed) = document.received_quantity else {
                tracing::warn!(
                    document = %contributor,
                    "Synthesis contributor has no received quantity, skipping branch"
                );
                continue;
            };
            edges.push(AncestorEdge::Group {
                ancestor: contributor,
                contributed,
            });
        }

        Ok(edges)
    }
}
