//! Error types for the reconciler

use crate::tag::TypeTag;
use thiserror::Error;
use void_scene::SceneError;

/// Errors surfaced by the host adaptation layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReconcileError {
    /// The element type is not in the registry
    #[error("Unsupported element type: {0}")]
    UnsupportedType(String),

    /// A prop is missing or malformed and has no sensible default
    #[error("Invalid props for {tag}: `{field}` {reason}")]
    InvalidProps {
        tag: TypeTag,
        field: String,
        reason: String,
    },

    /// An update payload was handed to an instance of another type
    #[error("Update payload does not apply to {0}")]
    PayloadMismatch(String),

    /// Failure raised by the retained object library
    #[error("Retained library error: {0}")]
    Library(#[from] SceneError),
}

impl ReconcileError {
    pub(crate) fn invalid_props(
        tag: TypeTag,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidProps {
            tag,
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for reconciler operations
pub type Result<T> = std::result::Result<T, ReconcileError>;
