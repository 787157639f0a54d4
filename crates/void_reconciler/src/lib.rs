//! # Void Reconciler - Declarative Scene Host
//!
//! Keeps a retained [`void_scene`] object graph in sync with a declarative
//! tree of elements. A reconciliation engine decides *what* changed between
//! two trees; this crate decides what that means for retained objects.
//!
//! ## Architecture
//!
//! ```text
//! Node tree ──► Reconciler ──► HostConfig callbacks ──► SceneHost
//!                                                          │
//!                  factory ◄── create_instance ────────────┤
//!                  attach  ◄── append / insert / remove ───┤
//!                  diff    ◄── prepare_update ─────────────┤
//!                  commit  ◄── commit_update ──────────────┘
//!                                   │
//!                                   ▼
//!                             ObjectStore (void_scene)
//! ```
//!
//! ## Key Concepts
//!
//! - **Element**: a typed node with props and ordered children
//! - **Instance**: the retained counterpart of a mounted element, tagged
//!   with its [`TypeTag`]
//! - **Attachment**: what a parent/child pairing means (mesh slot,
//!   renderer slot, scene edge, or nothing)
//! - **UpdatePayload**: field-level changes computed from two prop sets
//!
//! A renderer draws exactly when it first knows both a scene and a camera,
//! and again whenever its own update is committed. Nothing else renders.
//!
//! ## Example
//!
//! ```
//! use void_reconciler::prelude::*;
//!
//! let tree: Node = Element::new("threeWebGLRenderer")
//!     .prop("width", 300)
//!     .prop("height", 300)
//!     .child(Element::new("threeScene"))
//!     .child(
//!         Element::new("threePerspectiveCamera")
//!             .prop("position", [("z", 5.0)].into_iter().collect::<Value>()),
//!     )
//!     .into();
//!
//! let mut container = Container::new();
//! let reconciler = void_reconciler::mount(&tree, &mut container).unwrap();
//! assert_eq!(container.children().len(), 1);
//! assert!(reconciler.root_instance().is_some());
//! ```

pub mod attach;
pub mod commit;
pub mod config;
pub mod diff;
pub mod element;
pub mod engine;
pub mod error;
pub mod factory;
pub mod host;
pub mod instance;
pub mod props;
pub mod tag;
pub mod value;

pub use attach::{attach, attach_to_container, detach, detach_from_container, Attachment};
pub use commit::{commit, maybe_render};
pub use config::{Callback, CallbackTrace, ConfigError, ReconcilerConfig, UnsupportedTypePolicy};
pub use diff::{diff, CameraPatch, MeshPatch, RendererPatch, UpdatePayload};
pub use element::{Element, Node};
pub use engine::{mount, Reconciler};
pub use error::{ReconcileError, Result};
pub use factory::create_instance;
pub use host::{HostConfig, SceneHost};
pub use instance::{Instance, RendererInstance};
pub use tag::TypeTag;
pub use value::{Props, Value};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::ReconcilerConfig;
    pub use crate::element::{Element, Node};
    pub use crate::engine::Reconciler;
    pub use crate::error::{ReconcileError, Result};
    pub use crate::host::{HostConfig, SceneHost};
    pub use crate::instance::Instance;
    pub use crate::tag::TypeTag;
    pub use crate::value::{Props, Value};
    pub use void_scene::{Container, ObjectStore};
}
