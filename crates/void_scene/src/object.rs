//! Retained scene objects
//!
//! Objects are plain data. Relationships between them (a mesh's geometry,
//! a scene's children) are stored as [`ObjectId`]s into the owning store.

use crate::error::{Result, SceneError};
use crate::id::ObjectId;
use crate::renderer::Renderer;
use glam::DVec3;
use std::fmt;

/// The kind of a retained object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    BoxGeometry,
    MeshBasicMaterial,
    Mesh,
    Scene,
    PerspectiveCamera,
    Renderer,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoxGeometry => write!(f, "BoxGeometry"),
            Self::MeshBasicMaterial => write!(f, "MeshBasicMaterial"),
            Self::Mesh => write!(f, "Mesh"),
            Self::Scene => write!(f, "Scene"),
            Self::PerspectiveCamera => write!(f, "PerspectiveCamera"),
            Self::Renderer => write!(f, "Renderer"),
        }
    }
}

/// Any retained object
#[derive(Debug, Clone)]
pub enum Object {
    BoxGeometry(BoxGeometry),
    MeshBasicMaterial(MeshBasicMaterial),
    Mesh(Mesh),
    Scene(Scene),
    PerspectiveCamera(PerspectiveCamera),
    Renderer(Renderer),
}

impl Object {
    /// Get the kind of this object
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::BoxGeometry(_) => ObjectKind::BoxGeometry,
            Self::MeshBasicMaterial(_) => ObjectKind::MeshBasicMaterial,
            Self::Mesh(_) => ObjectKind::Mesh,
            Self::Scene(_) => ObjectKind::Scene,
            Self::PerspectiveCamera(_) => ObjectKind::PerspectiveCamera,
            Self::Renderer(_) => ObjectKind::Renderer,
        }
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Axis-aligned box geometry centered on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl BoxGeometry {
    /// Create a box with the given extents
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self { width, height, depth }
    }
}

impl Default for BoxGeometry {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

// ============================================================================
// Material
// ============================================================================

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(u32);

impl Color {
    /// White, the default material color
    pub const WHITE: Color = Color(0xffffff);

    /// Create from a `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self(hex & 0xffffff)
    }

    /// Parse a `#rrggbb` or `#rgb` style string
    pub fn from_style(style: &str) -> Result<Self> {
        let digits = style
            .strip_prefix('#')
            .ok_or_else(|| SceneError::InvalidColor(style.to_string()))?;
        let expanded: String = match digits.len() {
            6 => digits.to_string(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(SceneError::InvalidColor(style.to_string())),
        };
        u32::from_str_radix(&expanded, 16)
            .map(Self)
            .map_err(|_| SceneError::InvalidColor(style.to_string()))
    }

    /// Get the `0xRRGGBB` value
    pub fn hex(&self) -> u32 {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Optional material settings; `None` leaves the library default in place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialParameters {
    pub color: Option<Color>,
    pub opacity: Option<f64>,
    pub transparent: Option<bool>,
    pub wireframe: Option<bool>,
    pub visible: Option<bool>,
}

/// Unlit material with a flat color
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBasicMaterial {
    pub color: Color,
    pub opacity: f64,
    pub transparent: bool,
    pub wireframe: bool,
    pub visible: bool,
}

impl MeshBasicMaterial {
    /// Create a material from parameters
    pub fn new(parameters: &MaterialParameters) -> Self {
        let mut material = Self::default();
        material.set_values(parameters);
        material
    }

    /// Overwrite every field present in `parameters`
    pub fn set_values(&mut self, parameters: &MaterialParameters) {
        if let Some(color) = parameters.color {
            self.color = color;
        }
        if let Some(opacity) = parameters.opacity {
            self.opacity = opacity;
        }
        if let Some(transparent) = parameters.transparent {
            self.transparent = transparent;
        }
        if let Some(wireframe) = parameters.wireframe {
            self.wireframe = wireframe;
        }
        if let Some(visible) = parameters.visible {
            self.visible = visible;
        }
    }
}

impl Default for MeshBasicMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            visible: true,
        }
    }
}

// ============================================================================
// Mesh
// ============================================================================

/// Euler rotation in radians (XYZ order)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A drawable pairing of geometry and material
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub rotation: Euler,
    pub geometry: Option<ObjectId>,
    pub material: Option<ObjectId>,
}

impl Mesh {
    /// Create a mesh with no geometry or material
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the mesh produces a draw call
    pub fn is_drawable(&self) -> bool {
        self.geometry.is_some() && self.material.is_some()
    }
}

// ============================================================================
// Scene
// ============================================================================

/// Root of a drawable object graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    children: Vec<ObjectId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child; an existing child is moved to the end
    pub fn add(&mut self, child: ObjectId) {
        self.children.retain(|c| *c != child);
        self.children.push(child);
    }

    /// Remove a child, returning whether it was present
    pub fn remove(&mut self, child: ObjectId) -> bool {
        let before = self.children.len();
        self.children.retain(|c| *c != child);
        self.children.len() != before
    }

    /// Children in draw order
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

// ============================================================================
// Camera
// ============================================================================

/// Perspective projection camera
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub position: DVec3,
}

impl PerspectiveCamera {
    pub fn new(fov: f64, aspect: f64, near: f64, far: f64) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: DVec3::ZERO,
        }
    }

    /// Check that the frustum can be projected
    pub fn validate(&self) -> Result<()> {
        if self.near <= 0.0 || self.far <= self.near {
            return Err(SceneError::InvalidFrustum {
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_color_styles() {
        assert_eq!(Color::from_style("#00ff00").unwrap().hex(), 0x00ff00);
        assert_eq!(Color::from_style("#0f0").unwrap().hex(), 0x00ff00);
        assert!(Color::from_style("green").is_err());
        assert!(Color::from_style("#12345").is_err());
    }

    #[test]
    fn test_material_defaults_kept() {
        let material = MeshBasicMaterial::new(&MaterialParameters {
            color: Some(Color::from_hex(0x00ff00)),
            ..Default::default()
        });
        assert_eq!(material.color.hex(), 0x00ff00);
        assert_relative_eq!(material.opacity, 1.0);
        assert!(material.visible);
    }

    #[test]
    fn test_mesh_needs_both_slots_to_draw() {
        let mut mesh = Mesh::new();
        assert_eq!(mesh.rotation, Euler::default());
        mesh.geometry = Some(ObjectId::new(1, 0));
        assert!(!mesh.is_drawable());
        mesh.material = Some(ObjectId::new(2, 0));
        assert!(mesh.is_drawable());
    }

    #[test]
    fn test_scene_add_moves_existing_child() {
        let mut scene = Scene::new();
        let a = ObjectId::new(1, 0);
        let b = ObjectId::new(2, 0);
        scene.add(a);
        scene.add(b);
        scene.add(a);
        assert_eq!(scene.children(), &[b, a]);
        assert!(scene.remove(b));
        assert!(!scene.remove(b));
    }

    #[test]
    fn test_camera_frustum() {
        assert!(PerspectiveCamera::default().validate().is_ok());
        assert!(PerspectiveCamera::new(75.0, 1.0, 10.0, 1.0).validate().is_err());
        assert!(PerspectiveCamera::new(75.0, 1.0, 0.0, 1.0).validate().is_err());
    }

    #[test]
    fn test_camera_defaults() {
        let camera = PerspectiveCamera::default();
        assert_relative_eq!(camera.fov, 50.0);
        assert_relative_eq!(camera.near, 0.1);
        assert_relative_eq!(camera.position.length(), 0.0);
    }
}
