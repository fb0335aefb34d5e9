//! Per-kind ancestor resolution.
//!
//! Each document kind stores its ancestry differently; the resolvers
//! normalize all of them into one tagged adjacency so the engine is
//! written once. Resolution is a pure read over a [`DocumentStore`]
//! snapshot.

use async_trait::async_trait;
use custody_core::{DocumentId, GroupingEdge, Quantity, Result};
use custody_store::DocumentStore;
use std::sync::Arc;

mod clinical;
mod construction;
mod general;
mod packaging;

pub use clinical::ClinicalResolver;
pub use construction::ConstructionResolver;
pub use general::GeneralResolver;
pub use packaging::PackagingResolver;

/// One immediate ancestor of a document, tagged by relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AncestorEdge {
    /// 1:1 forwarding: the ancestor's waste was re-shipped as the
    /// current document after temporary storage.
    Forward {
        /// The predecessor document
        ancestor: DocumentId,
        /// The predecessor's own received quantity, the basis for the
        /// follow-up step
        ancestor_received: Option<Quantity>,
    },
    /// N:1 grouping: the ancestor contributed a recorded sub-quantity
    /// to the current document.
    Group {
        /// The contributor, post-redirect
        ancestor: DocumentId,
        /// Quantity the contributor put in, a fixed historical fact
        contributed: Quantity,
    },
}

/// Read-only ancestor adjacency for one document kind.
#[async_trait]
pub trait AncestorResolver: Send + Sync {
    /// The document's own received quantity.
    ///
    /// Fails with `NotFound` when the document does not exist.
    async fn received_quantity(&self, id: &DocumentId) -> Result<Option<Quantity>>;

    /// The document's immediate ancestors.
    ///
    /// Redirects are chased here, before the engine recurses, so the
    /// returned ids are always the live end of a forwarding chain.
    async fn ancestor_edges(&self, id: &DocumentId) -> Result<Vec<AncestorEdge>>;
}

/// The contributor a grouping edge points at once its redirect is
/// applied. A redirect is written when the contributor was later
/// forwarded into a newer document.
fn live_contributor(edge: &GroupingEdge) -> DocumentId {
    edge.redirect.unwrap_or(edge.contributor)
}

/// Shared adjacency for the kinds that combine 1:1 forwarding with
/// quantity-annotated grouping.
async fn forwarding_and_grouping_edges(
    store: &Arc<dyn DocumentStore>,
    id: &DocumentId,
) -> Result<Vec<AncestorEdge>> {
    let mut edges = Vec::new();

    if let Some(predecessor) = store.forwarding_predecessor(id).await? {
        let ancestor_received = store.document(&predecessor).await?.received_quantity;
        edges.push(AncestorEdge::Forward {
            ancestor: predecessor,
            ancestor_received,
        });
    }

    for grouping in store.grouping_edges(id).await? {
        edges.push(AncestorEdge::Group {
            ancestor: live_contributor(&grouping),
            contributed: grouping.contributed_quantity,
        });
    }

    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_supersedes_contributor() {
        let contributor = DocumentId::new();
        let newer = DocumentId::new();
        let mut edge = GroupingEdge {
            aggregate: DocumentId::new(),
            contributor,
            contributed_quantity: Quantity::from(5),
            redirect: None,
        };
        assert_eq!(live_contributor(&edge), contributor);
        edge.redirect = Some(newer);
        assert_eq!(live_contributor(&edge), newer);
    }
}
