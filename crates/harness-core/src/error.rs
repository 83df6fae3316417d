//! Marshalling errors.

use thiserror::Error;

/// Shape mismatch while converting between host containers and the
/// canonical encoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MarshalError {
    #[error("handler for {variant} is missing the '{branch}' branch")]
    MissingBranch {
        variant: &'static str,
        branch: &'static str,
    },

    #[error("expected {expected}, got {got}")]
    Shape {
        expected: &'static str,
        got: &'static str,
    },

    #[error("list is not terminated by Empty")]
    ImproperList,

    #[error("not a variant: {0}")]
    NotAVariant(String),

    #[error("record keys must be strings, got {0}")]
    RecordKey(String),

    #[error("{0} has no encoding")]
    Unrepresentable(String),

    #[error("number {0} cannot be serialized")]
    NonFinite(f64),

    #[error("json: {0}")]
    Json(String),
}
