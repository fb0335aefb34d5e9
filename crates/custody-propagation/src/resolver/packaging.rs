//! Resolver for packaging-scoped traceability.

use super::{AncestorEdge, AncestorResolver};
use async_trait::async_trait;
use custody_core::{DocumentId, PackagingFormation, Quantity, Result};
use custody_store::DocumentStore;
use std::sync::Arc;

/// Ancestry of individual packagings within fluid-waste shipments.
///
/// Ancestors are the previous packagings of the current one. The
/// attributed weight depends on how the shipment was formed: when the
/// contents were repackaged into new containers, the previous
/// packaging's own accepted weight is the last reliable figure for it;
/// in a forwarded or grouped shipment, the current packaging's
/// accepted weight supersedes whatever was recorded upstream.
pub struct PackagingResolver {
    store: Arc<dyn DocumentStore>,
}

impl PackagingResolver {
    /// Create a resolver over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AncestorResolver for PackagingResolver {
    async fn received_quantity(&self, id: &DocumentId) -> Result<Option<Quantity>> {
        Ok(self.store.document(id).await?.received_quantity)
    }

    async fn ancestor_edges(&self, id: &DocumentId) -> Result<Vec<AncestorEdge>> {
        let current = self.store.document(id).await?;
        let repackaged = current.packaging_formation == Some(PackagingFormation::Repackaged);

        let mut edges = Vec::new();
        for previous in self.store.previous_packagings(id).await? {
            let weight = if repackaged {
                self.store.document(&previous).await?.received_quantity
            } else {
                current.received_quantity
            };
            let Some(contributed) = weight else {
                tracing::warn!(
                    packaging = %previous,
                    "No accepted weight available for previous packaging, skipping branch"
                );
                continue;
            };
            edges.push(AncestorEdge::Group {
                ancestor: previous,
                contributed,
            });
        }

        Ok(edges)
    }
}
