//! Storage layer for custody tracking
//!
//! Two concerns live here, both behind `async_trait` interfaces so the
//! propagation engine stays storage-agnostic:
//!
//! - [`DocumentStore`]: point-in-time reads of transfer documents and
//!   the edges between them. Reads may be stale relative to concurrent
//!   document mutations; the triggering signature is committed before
//!   the hook fires, so staleness is acceptable.
//! - [`FinalOperationLedger`]: the accumulating per-ancestor ledger of
//!   attributable quantities. The increment is atomic at the storage
//!   layer so concurrent propagation branches stay correct.
//!
//! In-memory implementations back the tests and the synchronous
//! execution mode.

mod documents;
mod ledger;

pub use documents::{DocumentStore, MemoryDocumentStore};
pub use ledger::{FinalOperationLedger, FinalOperationRecord, LedgerUpsert, MemoryLedger};
