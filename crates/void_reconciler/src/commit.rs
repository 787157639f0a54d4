//! Commit applier
//!
//! Writes an [`UpdatePayload`] onto the retained object it was computed for.
//! Graph edges are never touched here.

use crate::diff::UpdatePayload;
use crate::error::{ReconcileError, Result};
use crate::instance::{Instance, RendererInstance};
use crate::tag::TypeTag;
use void_scene::{ObjectStore, RenderInfo};

/// Draw the renderer's scene through its camera if both are known.
///
/// This is the only place that issues a render.
pub fn maybe_render(
    store: &mut ObjectStore,
    renderer: &RendererInstance,
) -> Result<Option<RenderInfo>> {
    match (renderer.scene, renderer.camera) {
        (Some(scene), Some(camera)) => Ok(Some(store.render(renderer.renderer, scene, camera)?)),
        _ => Ok(None),
    }
}

/// Apply `payload` to `instance`
pub fn commit(store: &mut ObjectStore, instance: &Instance, payload: &UpdatePayload) -> Result<()> {
    match (instance, payload) {
        (_, UpdatePayload::NoChange) => {}
        (
            Instance::Object {
                tag: TypeTag::Mesh,
                id,
            },
            UpdatePayload::Mesh(patch),
        ) => {
            let mesh = store.mesh_mut(*id)?;
            if let Some(x) = patch.rotation_x {
                mesh.rotation.x = x;
            }
            if let Some(y) = patch.rotation_y {
                mesh.rotation.y = y;
            }
        }
        (
            Instance::Object {
                tag: TypeTag::PerspectiveCamera,
                id,
            },
            UpdatePayload::Camera(patch),
        ) => {
            let camera = store.camera_mut(*id)?;
            if let Some(fov) = patch.fov {
                camera.fov = fov;
            }
            if let Some(aspect) = patch.aspect {
                camera.aspect = aspect;
            }
            if let Some(near) = patch.near {
                camera.near = near;
            }
            if let Some(far) = patch.far {
                camera.far = far;
            }
            if let Some(x) = patch.position_x {
                camera.position.x = x;
            }
            if let Some(y) = patch.position_y {
                camera.position.y = y;
            }
            if let Some(z) = patch.position_z {
                camera.position.z = z;
            }
        }
        (Instance::Renderer(composite), UpdatePayload::Renderer(patch)) => {
            if let Some((width, height)) = patch.resize {
                store.renderer_mut(composite.renderer)?.set_size(width, height)?;
            }
            maybe_render(store, composite)?;
        }
        (instance, payload) => {
            return Err(ReconcileError::PayloadMismatch(format!(
                "{:?} cannot take {:?}",
                instance.tag(),
                payload
            )));
        }
    }
    Ok(())
}
