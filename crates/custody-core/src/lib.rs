//! Core types for waste-transfer custody tracking
//!
//! This crate defines the shared vocabulary of the custody workspace:
//!
//! - **Identifiers and quantities**: strongly typed document ids and
//!   exact-decimal quantities
//! - **Documents and edges**: the transfer-document model and the
//!   forwarding/grouping/synthesis relations between documents
//! - **Final codes**: the catalog of terminal treatment codes
//! - **Jobs**: the propagation job message exchanged over the queue

mod document;
mod error;
mod job;
mod types;

pub mod codes;

pub use document::{
    ForwardingEdge, GroupingEdge, PackagingFormation, PreviousPackagingEdge, SynthesisEdge,
    TransferDocument,
};
pub use error::{Error, Result};
pub use job::PropagationJob;
pub use types::{DocumentId, DocumentKind, Quantity};
