//! Final-operation traceability propagation
//!
//! When a transfer document's destination records a terminal treatment,
//! that outcome must be attributed to every upstream document that
//! contributed waste to it, however many forwarding or grouping hops
//! away. This crate implements that walk:
//!
//! - **Resolvers**: per-kind, read-only adjacency over the document
//!   graph, normalized into tagged forward/group edges
//! - **Engine**: the recursive, quantity-weighted ledger update, one
//!   job per edge traversed
//! - **Queue**: job transport, either durable-deferred (worker task,
//!   at-least-once) or run-on-submit (synchronous descent)
//! - **Hook**: the entry point fired when a destination operation is
//!   signed or revised

pub mod engine;
pub mod hook;
pub mod queue;
pub mod resolver;

pub use engine::PropagationEngine;
pub use hook::{OperationHook, RunMode};
pub use queue::{InlineQueue, JobQueue, RetryPolicy, WorkerQueue};
pub use resolver::{AncestorEdge, AncestorResolver};
