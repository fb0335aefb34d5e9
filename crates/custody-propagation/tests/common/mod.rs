//! Shared harness for propagation tests.

use custody_propagation::{InlineQueue, OperationHook, PropagationEngine};
use custody_store::{MemoryDocumentStore, MemoryLedger};
use std::sync::Arc;

/// In-memory store, ledger and engine wired together.
pub struct Harness {
    pub store: Arc<MemoryDocumentStore>,
    pub ledger: Arc<MemoryLedger>,
    pub engine: Arc<PropagationEngine>,
}

impl Harness {
    pub fn new() -> Self {
        // RUST_LOG=custody_propagation=debug surfaces each step.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();

        let store = Arc::new(MemoryDocumentStore::new());
        let ledger = Arc::new(MemoryLedger::new());
        let engine = Arc::new(PropagationEngine::with_default_resolvers(
            store.clone(),
            ledger.clone(),
        ));
        Self {
            store,
            ledger,
            engine,
        }
    }

    /// Hook submitting through the run-on-submit queue.
    #[allow(dead_code)]
    pub fn sync_hook(&self) -> OperationHook {
        OperationHook::new(
            self.engine.clone(),
            Arc::new(InlineQueue::new(self.engine.clone())),
        )
    }
}
