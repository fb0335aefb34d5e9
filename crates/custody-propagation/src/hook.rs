//! Entry point fired when a destination operation is signed or
//! revised.

use crate::engine::PropagationEngine;
use crate::queue::JobQueue;
use custody_core::{codes, PropagationJob, Result, TransferDocument};
use std::sync::Arc;

/// How a seed job is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Default: hand the seed to the job queue and return
    Enqueue,
    /// Run the whole descent before returning, for callers inside
    /// multi-step transactions and tests needing strict ordering
    Sync,
}

/// Seeds propagation when a document's destination operation becomes
/// terminal.
///
/// The signature subsystem owns the document and decides when the
/// operation is committed; this hook only reads the committed values.
pub struct OperationHook {
    engine: Arc<PropagationEngine>,
    queue: Arc<dyn JobQueue>,
}

impl OperationHook {
    /// Create a hook submitting through the given queue.
    pub fn new(engine: Arc<PropagationEngine>, queue: Arc<dyn JobQueue>) -> Self {
        Self { engine, queue }
    }

    /// Called whenever a destination-operation signature is recorded.
    ///
    /// No-op unless the operation is terminal for propagation (final
    /// code or `no_traceability` exemption) and a signature timestamp
    /// is present. Returns whether a propagation was seeded.
    pub async fn operation_signed(
        &self,
        document: &TransferDocument,
        mode: RunMode,
    ) -> Result<bool> {
        if document.operation_signed_at.is_none() || !document.is_terminal_for_propagation() {
            return Ok(false);
        }

        let seed = PropagationJob::seed(document);
        tracing::debug!(
            document = %document.id,
            kind = %document.kind,
            code = seed.operation_code.as_str(),
            no_traceability = seed.no_traceability,
            "Seeding final-operation propagation"
        );
        match mode {
            RunMode::Enqueue => self.queue.submit(seed).await?,
            RunMode::Sync => self.engine.run_to_completion(seed).await?,
        }
        Ok(true)
    }

    /// Called after a revision changed a document's operation code.
    ///
    /// A previously-final code revised to a non-final one invalidates
    /// every ledger row pointing at this final document; a non-final
    /// code revised to a final one triggers propagation exactly as on
    /// first signature.
    pub async fn operation_revised(
        &self,
        before: &TransferDocument,
        after: &TransferDocument,
        mode: RunMode,
    ) -> Result<()> {
        let was_final = code_is_final(before);
        let is_final = code_is_final(after);

        if is_final && !was_final {
            self.operation_signed(after, mode).await?;
        } else if was_final && !is_final {
            let removed = self
                .engine
                .ledger()
                .delete_all_for_final(&after.id, after.kind)
                .await?;
            tracing::info!(
                document = %after.id,
                removed,
                "Revision invalidated final operation, ledger rows deleted"
            );
        }
        Ok(())
    }
}

fn code_is_final(document: &TransferDocument) -> bool {
    document
        .operation_code
        .as_deref()
        .is_some_and(codes::is_final_operation_code)
}
