//! Error types for the retained object library

use crate::id::{ObjectId, SurfaceId};
use crate::object::ObjectKind;
use thiserror::Error;

/// Errors raised while constructing, mutating or rendering retained objects
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// The handle was released or never allocated by this store
    #[error("Stale object handle: {0:?}")]
    StaleObject(ObjectId),

    /// The handle points at an object of a different kind
    #[error("Object {id:?} is a {found}, expected a {expected}")]
    WrongKind {
        id: ObjectId,
        expected: ObjectKind,
        found: ObjectKind,
    },

    /// Surfaces must have a non-zero extent
    #[error("Invalid surface size: {width}x{height}")]
    InvalidSurfaceSize { width: u32, height: u32 },

    /// The camera cannot produce a projection
    #[error("Invalid camera frustum: near={near}, far={far}")]
    InvalidFrustum { near: f64, far: f64 },

    /// Unparseable color style
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Container operations on a surface that is not mounted there
    #[error("Surface {0:?} is not a child of the container")]
    SurfaceNotInContainer(SurfaceId),
}

/// Result type for retained object operations
pub type Result<T> = std::result::Result<T, SceneError>;
