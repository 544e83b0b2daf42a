//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the catalog model.
///
/// The graph engine itself never fails: missing roots and malformed links
/// are absorbed. Only taxonomy construction can be rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("layer registered as both endpoint and throughpoint: {key}")]
    AmbiguousLayer { key: String },
}
