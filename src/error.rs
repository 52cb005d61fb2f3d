//! Error types for metric tree operations

use std::fmt::Display;

use thiserror::Error;

use crate::{node::NodeType, value::InputEncryption};

/// Error type for tree operations
///
/// `EngineError` is the error type of the secure computation engine backing the
/// secret-shared leaves. Plaintext-only trees use [`std::convert::Infallible`].
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum MetricError<EngineError> {
    /// Accessor used on the wrong tag, or operands of different tag or mode
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    /// Lists of different lengths met during accumulation
    #[error("list lengths do not match: {left} != {right}")]
    ShapeMismatch { left: usize, right: usize },
    /// Operation not implemented for this encryption mode
    #[error("{operation} is not supported for {encryption} values")]
    UnsupportedEncryption {
        operation: &'static str,
        encryption: InputEncryption,
    },
    /// Document holds a value kind that cannot become a node
    #[error("unsupported schema value: {0}, only integers, arrays and objects are allowed")]
    UnsupportedSchema(String),
    /// Mutation method called on a node of the wrong tag
    #[error("{operation} is only valid on a {expected} node, found {found}")]
    Misuse {
        operation: &'static str,
        expected: NodeType,
        found: NodeType,
    },
    /// Dict lookup of an absent key
    #[error("key `{0}` not found")]
    KeyNotFound(String),
    /// List lookup past the end
    #[error("index {index} out of bounds for list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// Text that is not valid JSON
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// Secure computation engine error
    #[error("secure computation engine error: {0}")]
    Engine(EngineError),
}

impl<EngineError> MetricError<EngineError> {
    pub(crate) fn type_mismatch(expected: impl ToString, found: impl ToString) -> Self {
        let (expected, found) = (expected.to_string(), found.to_string());
        tracing::error!(%expected, %found, "metric type mismatch");
        Self::TypeMismatch { expected, found }
    }

    pub(crate) fn unsupported_encryption(
        operation: &'static str,
        encryption: InputEncryption,
    ) -> Self {
        tracing::error!(operation, %encryption, "encryption type is not supported");
        Self::UnsupportedEncryption {
            operation,
            encryption,
        }
    }

    pub(crate) fn misuse(operation: &'static str, expected: NodeType, found: NodeType) -> Self {
        tracing::error!(operation, %expected, %found, "incorrect operation for the type of member");
        Self::Misuse {
            operation,
            expected,
            found,
        }
    }
}

impl<EngineError: Display> MetricError<EngineError> {
    pub(crate) fn engine(err: EngineError) -> Self {
        tracing::error!(error = %err, "secure computation engine failed");
        Self::Engine(err)
    }
}
