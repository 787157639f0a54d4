//! The closed set of element types the registry knows about

use crate::error::ReconcileError;
use std::fmt;
use std::str::FromStr;

/// Supported element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    BoxGeometry,
    MeshBasicMaterial,
    Mesh,
    Scene,
    PerspectiveCamera,
    WebGlRenderer,
}

impl TypeTag {
    /// Every registered tag
    pub const ALL: [TypeTag; 6] = [
        TypeTag::BoxGeometry,
        TypeTag::MeshBasicMaterial,
        TypeTag::Mesh,
        TypeTag::Scene,
        TypeTag::PerspectiveCamera,
        TypeTag::WebGlRenderer,
    ];

    /// Element type name used in declarative trees
    pub fn name(&self) -> &'static str {
        match self {
            Self::BoxGeometry => "threeBoxGeometry",
            Self::MeshBasicMaterial => "threeMeshBasicMaterial",
            Self::Mesh => "threeMesh",
            Self::Scene => "threeScene",
            Self::PerspectiveCamera => "threePerspectiveCamera",
            Self::WebGlRenderer => "threeWebGLRenderer",
        }
    }

    /// Look up a tag by element type name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.name() == name)
    }

    /// Whether instances of this tag can be children of a scene
    pub fn is_scene_node(&self) -> bool {
        matches!(self, Self::Mesh | Self::Scene | Self::PerspectiveCamera)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ReconcileError::UnsupportedType(s.to_string()))
    }
}
