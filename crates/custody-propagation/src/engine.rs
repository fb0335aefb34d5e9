//! The propagation engine: one quantity-weighted ledger update per
//! graph edge.

use crate::resolver::{
    AncestorEdge, AncestorResolver, ClinicalResolver, ConstructionResolver, GeneralResolver,
    PackagingResolver,
};
use custody_core::{DocumentKind, Error, PropagationJob, Result};
use custody_store::{DocumentStore, FinalOperationLedger, LedgerUpsert};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Walks the ancestor graph backwards from a final operation and
/// accumulates attributable quantities into the ledger.
///
/// The engine is resolver-agnostic: each document kind registers its
/// own [`AncestorResolver`] and the algorithm runs unchanged. One call
/// to [`step`](Self::step) processes one job and emits one follow-up
/// job per ancestor edge; [`run_to_completion`](Self::run_to_completion)
/// drains a whole descent in one call for callers that need immediate
/// consistency.
pub struct PropagationEngine {
    resolvers: HashMap<DocumentKind, Arc<dyn AncestorResolver>>,
    ledger: Arc<dyn FinalOperationLedger>,
}

impl PropagationEngine {
    /// Create an engine with no resolvers registered.
    pub fn new(ledger: Arc<dyn FinalOperationLedger>) -> Self {
        Self {
            resolvers: HashMap::new(),
            ledger,
        }
    }

    /// Create an engine with every document kind resolved against the
    /// same document store.
    pub fn with_default_resolvers(
        store: Arc<dyn DocumentStore>,
        ledger: Arc<dyn FinalOperationLedger>,
    ) -> Self {
        Self::new(ledger)
            .with_resolver(DocumentKind::General, GeneralResolver::new(store.clone()))
            .with_resolver(
                DocumentKind::Construction,
                ConstructionResolver::new(store.clone()),
            )
            .with_resolver(DocumentKind::Clinical, ClinicalResolver::new(store.clone()))
            .with_resolver(DocumentKind::Packaging, PackagingResolver::new(store))
    }

    /// Register the resolver for one document kind.
    pub fn with_resolver(
        mut self,
        kind: DocumentKind,
        resolver: impl AncestorResolver + 'static,
    ) -> Self {
        self.resolvers.insert(kind, Arc::new(resolver));
        self
    }

    /// The ledger this engine writes to.
    pub fn ledger(&self) -> &Arc<dyn FinalOperationLedger> {
        &self.ledger
    }

    fn resolver(&self, kind: DocumentKind) -> Result<&Arc<dyn AncestorResolver>> {
        self.resolvers
            .get(&kind)
            .ok_or_else(|| Error::inconsistency(format!("no resolver registered for kind {kind}")))
    }

    /// Process one propagation job: upsert the ledger row for the
    /// job's (initial, final) pair, then emit one follow-up job per
    /// ancestor edge.
    ///
    /// The ledger write commits before ancestors are resolved, so a
    /// `NotFound` on the ancestor side never undoes the current row.
    pub async fn step(&self, job: &PropagationJob) -> Result<Vec<PropagationJob>> {
        let resolver = self.resolver(job.kind)?;

        let q_base = match job.quantity {
            Some(quantity) => quantity,
            None => resolver
                .received_quantity(&job.initial)
                .await?
                .ok_or_else(|| {
                    Error::inconsistency(format!(
                        "terminal operation on document {} with no received quantity",
                        job.initial
                    ))
                })?,
        };
        let attributable = q_base.scale(job.fraction);

        self.ledger
            .upsert_increment(LedgerUpsert {
                initial: job.initial,
                r#final: job.r#final,
                kind: job.kind,
                operation_code: job.operation_code.clone(),
                no_traceability: job.no_traceability,
                quantity: attributable,
            })
            .await?;
        tracing::debug!(
            initial = %job.initial,
            r#final = %job.r#final,
            quantity = %attributable,
            fraction = %job.fraction,
            "Attributed final operation"
        );

        let edges = resolver.ancestor_edges(&job.initial).await?;
        if edges.is_empty() {
            return Ok(Vec::new());
        }

        // Denominator for group edges: the current document's own
        // received quantity, the same ratio for every group ancestor
        // at this level.
        let current_received = resolver.received_quantity(&job.initial).await?;

        let mut follow_ups = Vec::with_capacity(edges.len());
        for edge in edges {
            match edge {
                AncestorEdge::Forward {
                    ancestor,
                    ancestor_received,
                } => match ancestor_received {
                    Some(received) if !received.is_zero() => {
                        // Reset the basis to the ancestor's own total;
                        // the fraction re-expresses the attributable
                        // share against it.
                        let fraction = attributable / received;
                        follow_ups.push(job.follow_up(ancestor, received, fraction));
                    }
                    _ => {
                        tracing::warn!(
                            ancestor = %ancestor,
                            r#final = %job.r#final,
                            "Forwarding ancestor has no usable received quantity, skipping branch"
                        );
                    }
                },
                AncestorEdge::Group {
                    ancestor,
                    contributed,
                } => {
                    let Some(fraction) =
                        current_received.and_then(|received| attributable.ratio_to(received))
                    else {
                        tracing::warn!(
                            ancestor = %ancestor,
                            document = %job.initial,
                            "Grouping document has no usable received quantity, skipping branch"
                        );
                        continue;
                    };
                    follow_ups.push(job.follow_up(ancestor, contributed, fraction));
                }
            }
        }
        Ok(follow_ups)
    }

    /// Synchronous mode: drain the whole recursive descent in one
    /// call, one iterative worklist instead of one queue round-trip
    /// per edge.
    ///
    /// A missing ancestor abandons its branch with a warning; any
    /// other error propagates, leaving sibling writes committed. Each
    /// edge is its own commit unit and nothing is rolled back.
    pub async fn run_to_completion(&self, seed: PropagationJob) -> Result<()> {
        let mut worklist = VecDeque::from([seed]);
        while let Some(job) = worklist.pop_front() {
            match self.step(&job).await {
                Ok(follow_ups) => worklist.extend(follow_ups),
                Err(Error::NotFound(id)) => {
                    tracing::warn!(
                        document = %id,
                        r#final = %job.r#final,
                        "Referenced document missing, abandoning branch"
                    );
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }
}
