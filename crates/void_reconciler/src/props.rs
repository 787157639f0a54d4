//! Typed views over the props each element type reads
//!
//! Only the documented subset of props is read per type. Optional fields
//! that are absent (or null) stay `None` so the library default applies;
//! present fields of the wrong type are rejected.

use crate::error::{ReconcileError, Result};
use crate::tag::TypeTag;
use crate::value::{Props, Value};
use void_scene::{Color, MaterialParameters};

/// Largest 24-bit RGB value
const MAX_HEX_COLOR: u32 = 0xff_ffff;

fn field<'a>(props: &'a Props, name: &str) -> Option<&'a Value> {
    props.get(name).filter(|v| !v.is_null())
}

fn number(tag: TypeTag, value: Option<&Value>, name: &str) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_float().map(Some).ok_or_else(|| {
            let reason = format!("expected a number, found {}", v.type_name());
            ReconcileError::invalid_props(tag, name, reason)
        }),
    }
}

fn boolean(tag: TypeTag, value: Option<&Value>, name: &str) -> Result<Option<bool>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_bool().map(Some).ok_or_else(|| {
            let reason = format!("expected a bool, found {}", v.type_name());
            ReconcileError::invalid_props(tag, name, reason)
        }),
    }
}

fn required_object<'a>(tag: TypeTag, props: &'a Props, name: &str) -> Result<&'a Value> {
    match field(props, name) {
        Some(v @ Value::Object(_)) => Ok(v),
        Some(v) => Err(ReconcileError::invalid_props(
            tag,
            name,
            format!("expected an object, found {}", v.type_name()),
        )),
        None => Err(ReconcileError::invalid_props(tag, name, "is required")),
    }
}

fn dimension(tag: TypeTag, props: &Props, name: &str) -> Result<u32> {
    let value = number(tag, field(props, name), name)?
        .ok_or_else(|| ReconcileError::invalid_props(tag, name, "is required"))?;
    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(ReconcileError::invalid_props(
            tag,
            name,
            format!("{} is not a valid pixel size", value),
        ));
    }
    Ok(value.floor() as u32)
}

/// `threeBoxGeometry { width, height, depth }`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxGeometryProps {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
}

impl BoxGeometryProps {
    pub fn from_props(props: &Props) -> Result<Self> {
        let tag = TypeTag::BoxGeometry;
        Ok(Self {
            width: number(tag, field(props, "width"), "width")?,
            height: number(tag, field(props, "height"), "height")?,
            depth: number(tag, field(props, "depth"), "depth")?,
        })
    }
}

/// `threeMeshBasicMaterial { parameters }`
///
/// `parameters` is handed through to the material. Keys the material does
/// not know are skipped with a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialProps {
    pub parameters: MaterialParameters,
}

impl MaterialProps {
    pub fn from_props(props: &Props) -> Result<Self> {
        let tag = TypeTag::MeshBasicMaterial;
        let mut parameters = MaterialParameters::default();

        let Some(raw) = field(props, "parameters") else {
            return Ok(Self { parameters });
        };
        let raw = raw.as_object().ok_or_else(|| {
            let reason = format!("expected an object, found {}", raw.type_name());
            ReconcileError::invalid_props(tag, "parameters", reason)
        })?;

        for (key, value) in raw {
            let name = format!("parameters.{}", key);
            match key.as_str() {
                "color" => {
                    parameters.color = match value {
                        Value::Null => None,
                        Value::Int(hex) => match u32::try_from(*hex) {
                            Ok(hex) if hex <= MAX_HEX_COLOR => Some(Color::from_hex(hex)),
                            _ => {
                                let reason = format!("{} is outside 0..=0xffffff", hex);
                                return Err(ReconcileError::invalid_props(tag, name, reason));
                            }
                        },
                        Value::String(style) => Some(Color::from_style(style)?),
                        other => {
                            let reason = format!(
                                "expected a hex number or color string, found {}",
                                other.type_name()
                            );
                            return Err(ReconcileError::invalid_props(tag, name, reason));
                        }
                    }
                }
                "opacity" => parameters.opacity = number(tag, Some(value), &name)?,
                "transparent" => parameters.transparent = boolean(tag, Some(value), &name)?,
                "wireframe" => parameters.wireframe = boolean(tag, Some(value), &name)?,
                "visible" => parameters.visible = boolean(tag, Some(value), &name)?,
                _ => log::warn!("'{}' is not a property of MeshBasicMaterial", key),
            }
        }

        Ok(Self { parameters })
    }
}

/// `threeMesh { rotation: { x?, y? } }`
///
/// The rotation object itself is required.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeshProps {
    pub rotation_x: Option<f64>,
    pub rotation_y: Option<f64>,
}

impl MeshProps {
    pub fn from_props(props: &Props) -> Result<Self> {
        let tag = TypeTag::Mesh;
        let rotation = required_object(tag, props, "rotation")?;
        Ok(Self {
            rotation_x: number(tag, rotation.get("x"), "rotation.x")?,
            rotation_y: number(tag, rotation.get("y"), "rotation.y")?,
        })
    }
}

/// `threePerspectiveCamera { fov, aspect, near, far, position: { x?, y?, z? } }`
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraProps {
    pub fov: Option<f64>,
    pub aspect: Option<f64>,
    pub near: Option<f64>,
    pub far: Option<f64>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub position_z: Option<f64>,
}

impl CameraProps {
    pub fn from_props(props: &Props) -> Result<Self> {
        let tag = TypeTag::PerspectiveCamera;
        let position = required_object(tag, props, "position")?;
        Ok(Self {
            fov: number(tag, field(props, "fov"), "fov")?,
            aspect: number(tag, field(props, "aspect"), "aspect")?,
            near: number(tag, field(props, "near"), "near")?,
            far: number(tag, field(props, "far"), "far")?,
            position_x: number(tag, position.get("x"), "position.x")?,
            position_y: number(tag, position.get("y"), "position.y")?,
            position_z: number(tag, position.get("z"), "position.z")?,
        })
    }
}

/// `threeWebGLRenderer { width, height, antialias }`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RendererProps {
    pub width: u32,
    pub height: u32,
    pub antialias: bool,
}

impl RendererProps {
    pub fn from_props(props: &Props) -> Result<Self> {
        let tag = TypeTag::WebGlRenderer;
        Ok(Self {
            width: dimension(tag, props, "width")?,
            height: dimension(tag, props, "height")?,
            antialias: boolean(tag, field(props, "antialias"), "antialias")?.unwrap_or(false),
        })
    }
}
