//! # void_scene - Retained Scene Objects
//!
//! A small retained-mode object library: everything that is drawn lives in
//! an [`ObjectStore`] and is referenced through generational [`ObjectId`]s.
//! Callers construct objects, wire them together (mesh slots, scene
//! children) and ask a [`Renderer`] to draw a scene through a camera.
//!
//! ## Architecture
//!
//! ```text
//! Renderer ──► Surface ──► Container (screen)
//!    │
//!    └── render(scene, camera)
//!          │
//!          ▼
//!        Scene ──► Mesh ──► BoxGeometry
//!                    └────► MeshBasicMaterial
//! ```
//!
//! The library never decides *when* to draw. Rendering happens only when a
//! caller invokes [`ObjectStore::render`].

pub mod container;
pub mod error;
pub mod id;
pub mod object;
pub mod renderer;
pub mod store;

pub use container::Container;
pub use error::{Result, SceneError};
pub use id::{ObjectId, SurfaceId};
pub use object::{
    BoxGeometry, Color, Euler, MaterialParameters, Mesh, MeshBasicMaterial, Object, ObjectKind,
    PerspectiveCamera, Scene,
};
pub use renderer::{RenderInfo, Renderer, RendererParameters, Surface};
pub use store::ObjectStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::container::Container;
    pub use crate::error::{Result, SceneError};
    pub use crate::id::{ObjectId, SurfaceId};
    pub use crate::object::{Object, ObjectKind};
    pub use crate::store::ObjectStore;
}
