//! Instance factory
//!
//! Turns an element type and its props into a freshly allocated retained
//! object. Nothing is attached here; wiring happens in [`crate::attach`].

use crate::error::Result;
use crate::instance::{Instance, RendererInstance};
use crate::props::{BoxGeometryProps, CameraProps, MaterialProps, MeshProps, RendererProps};
use crate::tag::TypeTag;
use crate::value::Props;
use void_scene::{
    BoxGeometry, Mesh, MeshBasicMaterial, Object, ObjectStore, PerspectiveCamera, Renderer,
    RendererParameters, Scene,
};

/// Construct the retained instance for `tag`
pub fn create_instance(store: &mut ObjectStore, tag: TypeTag, props: &Props) -> Result<Instance> {
    let instance = match tag {
        TypeTag::BoxGeometry => {
            let p = BoxGeometryProps::from_props(props)?;
            let defaults = BoxGeometry::default();
            let geometry = BoxGeometry::new(
                p.width.unwrap_or(defaults.width),
                p.height.unwrap_or(defaults.height),
                p.depth.unwrap_or(defaults.depth),
            );
            Instance::object(tag, store.insert(Object::BoxGeometry(geometry)))
        }
        TypeTag::MeshBasicMaterial => {
            let p = MaterialProps::from_props(props)?;
            let material = MeshBasicMaterial::new(&p.parameters);
            Instance::object(tag, store.insert(Object::MeshBasicMaterial(material)))
        }
        TypeTag::Mesh => {
            let p = MeshProps::from_props(props)?;
            let mut mesh = Mesh::new();
            if let Some(x) = p.rotation_x {
                mesh.rotation.x = x;
            }
            if let Some(y) = p.rotation_y {
                mesh.rotation.y = y;
            }
            Instance::object(tag, store.insert(Object::Mesh(mesh)))
        }
        TypeTag::Scene => Instance::object(tag, store.insert(Object::Scene(Scene::new()))),
        TypeTag::PerspectiveCamera => {
            let p = CameraProps::from_props(props)?;
            let defaults = PerspectiveCamera::default();
            let mut camera = PerspectiveCamera::new(
                p.fov.unwrap_or(defaults.fov),
                p.aspect.unwrap_or(defaults.aspect),
                p.near.unwrap_or(defaults.near),
                p.far.unwrap_or(defaults.far),
            );
            if let Some(x) = p.position_x {
                camera.position.x = x;
            }
            if let Some(y) = p.position_y {
                camera.position.y = y;
            }
            if let Some(z) = p.position_z {
                camera.position.z = z;
            }
            Instance::object(tag, store.insert(Object::PerspectiveCamera(camera)))
        }
        TypeTag::WebGlRenderer => {
            let p = RendererProps::from_props(props)?;
            let mut renderer = Renderer::new(RendererParameters {
                antialias: p.antialias,
            });
            renderer.set_size(p.width, p.height)?;
            let surface = renderer.surface().id;
            let id = store.insert(Object::Renderer(renderer));
            Instance::Renderer(RendererInstance::new(id, surface))
        }
    };

    log::debug!("Created {} as {:?}", tag, instance.object_id());
    Ok(instance)
}
