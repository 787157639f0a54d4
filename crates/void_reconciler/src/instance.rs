//! Retained instances as seen by the reconciler
//!
//! Every instance carries its [`TypeTag`] next to the object handle, so
//! attachment rules never have to ask the library what an object is.

use crate::tag::TypeTag;
use void_scene::{ObjectId, SurfaceId};

/// The retained counterpart of one mounted element
#[derive(Debug, Clone, PartialEq)]
pub enum Instance {
    /// Placeholder for unsupported types and text; every attach is a no-op
    Null,
    /// A single retained object
    Object { tag: TypeTag, id: ObjectId },
    /// A renderer paired with the scene and camera it draws
    Renderer(RendererInstance),
}

/// Composite record for a renderer element
#[derive(Debug, Clone, PartialEq)]
pub struct RendererInstance {
    pub renderer: ObjectId,
    /// Presentation surface inserted into the container at top level
    pub surface: SurfaceId,
    pub scene: Option<ObjectId>,
    pub camera: Option<ObjectId>,
}

impl RendererInstance {
    pub fn new(renderer: ObjectId, surface: SurfaceId) -> Self {
        Self {
            renderer,
            surface,
            scene: None,
            camera: None,
        }
    }

    /// Both slots filled
    pub fn is_complete(&self) -> bool {
        self.scene.is_some() && self.camera.is_some()
    }
}

impl Instance {
    pub fn object(tag: TypeTag, id: ObjectId) -> Self {
        Self::Object { tag, id }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn tag(&self) -> Option<TypeTag> {
        match self {
            Self::Null => None,
            Self::Object { tag, .. } => Some(*tag),
            Self::Renderer(_) => Some(TypeTag::WebGlRenderer),
        }
    }

    /// Handle of the primary retained object
    pub fn object_id(&self) -> Option<ObjectId> {
        match self {
            Self::Null => None,
            Self::Object { id, .. } => Some(*id),
            Self::Renderer(r) => Some(r.renderer),
        }
    }

    /// Surface to mount into the container, if this instance owns one
    pub fn surface(&self) -> Option<SurfaceId> {
        match self {
            Self::Renderer(r) => Some(r.surface),
            _ => None,
        }
    }

    pub fn as_renderer(&self) -> Option<&RendererInstance> {
        match self {
            Self::Renderer(r) => Some(r),
            _ => None,
        }
    }
}
