//! Aggregation trees of metrics
//!
//! This crate represents hierarchical metrics (integers, lists and maps, nested
//! arbitrarily) and merges them leaf by leaf, either over plaintext integers or
//! over two-party XOR secret shares inside a secure computation.
//!
//! The crate supports:
//! - Schema driven construction from JSON documents
//! - In place accumulation of one tree into another
//! - Shape preserving replication with zero leaves
//! - Promotion of plaintext leaves to secret shares
//! - Oblivious select and secure comparison on leaves
//! - Export to JSON, optionally revealing secret leaves to one party
//!
//! Secure operations go through the [`SecretShare`] and [`ShareEngine`] traits.
//! [`XorEngine`] is an in-process two-party implementation.

pub mod engine;
mod error;
mod node;
pub mod schema;
pub mod touchpoint;
pub mod tree;
mod value;

pub use engine::{Party, SecretShare, ShareEngine, Unshared, XorBit, XorEngine, XorError, XorShare};
pub use error::MetricError;
pub use node::{DisplayTree, MetricDict, MetricList, MetricNode, NodeType, PrintOptions};
pub use schema::{from_document, from_json, to_document, to_revealed_document};
pub use tree::{accumulate, has_same_shape, is_greater_or_equal, mux, new_like, promote_all};
pub use value::{Condition, InputEncryption, SecureValue, SharePolicy};

/// Tree whose leaves never leave plaintext.
pub type PlaintextMetrics = MetricNode<Unshared>;

#[cfg(test)]
mod tests;
