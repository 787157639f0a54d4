//! Update differ
//!
//! Compares old and new props of a mounted element and reports which
//! post-construction fields need to change. Only fields on each type's
//! allow-list are compared; everything else is fixed at construction.

use crate::error::Result;
use crate::props::{CameraProps, MeshProps, RendererProps};
use crate::tag::TypeTag;
use crate::value::{same_props, Props};

/// Field-level changes for one instance
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePayload {
    /// Nothing visible changed
    NoChange,
    Mesh(MeshPatch),
    Camera(CameraPatch),
    /// The renderer re-validates and redraws on every reported update
    Renderer(RendererPatch),
}

impl UpdatePayload {
    pub fn is_no_change(&self) -> bool {
        matches!(self, Self::NoChange)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshPatch {
    pub rotation_x: Option<f64>,
    pub rotation_y: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraPatch {
    pub fov: Option<f64>,
    pub aspect: Option<f64>,
    pub near: Option<f64>,
    pub far: Option<f64>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub position_z: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererPatch {
    /// New surface size when width or height changed
    pub resize: Option<(u32, u32)>,
}

/// New value if it is present and differs from the old one.
///
/// Values compare by bit pattern: `NaN` is unchanged against `NaN`, and
/// `-0.0` against `0.0` is a change.
fn changed(old: Option<f64>, new: Option<f64>) -> Option<f64> {
    new.filter(|n| old.map(f64::to_bits) != Some(n.to_bits()))
}

/// Compute the patch that turns `old` into `new` for an instance of `tag`
pub fn diff(tag: TypeTag, old: &Props, new: &Props) -> Result<UpdatePayload> {
    let payload = match tag {
        TypeTag::Mesh => {
            let (o, n) = (MeshProps::from_props(old)?, MeshProps::from_props(new)?);
            let patch = MeshPatch {
                rotation_x: changed(o.rotation_x, n.rotation_x),
                rotation_y: changed(o.rotation_y, n.rotation_y),
            };
            if patch == MeshPatch::default() {
                UpdatePayload::NoChange
            } else {
                UpdatePayload::Mesh(patch)
            }
        }
        TypeTag::PerspectiveCamera => {
            let (o, n) = (CameraProps::from_props(old)?, CameraProps::from_props(new)?);
            let patch = CameraPatch {
                fov: changed(o.fov, n.fov),
                aspect: changed(o.aspect, n.aspect),
                near: changed(o.near, n.near),
                far: changed(o.far, n.far),
                position_x: changed(o.position_x, n.position_x),
                position_y: changed(o.position_y, n.position_y),
                position_z: changed(o.position_z, n.position_z),
            };
            if patch == CameraPatch::default() {
                UpdatePayload::NoChange
            } else {
                UpdatePayload::Camera(patch)
            }
        }
        TypeTag::WebGlRenderer => {
            if same_props(old, new) {
                UpdatePayload::NoChange
            } else {
                let o = RendererProps::from_props(old)?;
                let n = RendererProps::from_props(new)?;
                let resize =
                    ((o.width, o.height) != (n.width, n.height)).then_some((n.width, n.height));
                UpdatePayload::Renderer(RendererPatch { resize })
            }
        }
        TypeTag::BoxGeometry | TypeTag::MeshBasicMaterial | TypeTag::Scene => {
            UpdatePayload::NoChange
        }
    };
    Ok(payload)
}
