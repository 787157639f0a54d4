//! Attachment resolver
//!
//! Parent/child relationships are interpreted per type pair:
//!
//! | parent   | child              | effect                                 |
//! |----------|--------------------|----------------------------------------|
//! | mesh     | geometry, material | fill the matching slot (overwrite)     |
//! | renderer | scene, camera      | fill the matching slot, maybe render   |
//! | scene    | mesh, scene, camera| scene-graph edge                       |
//! | *        | *                  | ignored                                |
//!
//! These functions are the only place graph edges and slots change.

use crate::commit::maybe_render;
use crate::error::Result;
use crate::instance::Instance;
use crate::tag::TypeTag;
use void_scene::{Container, ObjectId, ObjectStore};

/// What an attach or detach did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    MeshGeometry,
    MeshMaterial,
    RendererScene,
    RendererCamera,
    SceneChild,
    /// Surface inserted into or removed from the container
    Surface,
    /// The pairing has no meaning
    Ignored,
}

/// Relate `child` to `parent`.
///
/// `before` is accepted for positional fidelity but scene children are
/// always appended; sibling order only affects draw order.
pub fn attach(
    store: &mut ObjectStore,
    parent: &mut Instance,
    child: &Instance,
    before: Option<&Instance>,
) -> Result<Attachment> {
    let Some(child_tag) = child.tag() else {
        return Ok(Attachment::Ignored);
    };
    let Some(child_id) = child.object_id() else {
        return Ok(Attachment::Ignored);
    };

    let attachment = match parent {
        Instance::Object {
            tag: TypeTag::Mesh,
            id,
        } => match child_tag {
            TypeTag::BoxGeometry => {
                store.mesh_mut(*id)?.geometry = Some(child_id);
                Attachment::MeshGeometry
            }
            TypeTag::MeshBasicMaterial => {
                store.mesh_mut(*id)?.material = Some(child_id);
                Attachment::MeshMaterial
            }
            TypeTag::Mesh
            | TypeTag::Scene
            | TypeTag::PerspectiveCamera
            | TypeTag::WebGlRenderer => Attachment::Ignored,
        },
        Instance::Renderer(composite) => {
            let (slot, attachment) = match child_tag {
                TypeTag::Scene => (&mut composite.scene, Attachment::RendererScene),
                TypeTag::PerspectiveCamera => (&mut composite.camera, Attachment::RendererCamera),
                TypeTag::BoxGeometry
                | TypeTag::MeshBasicMaterial
                | TypeTag::Mesh
                | TypeTag::WebGlRenderer => return Ok(Attachment::Ignored),
            };
            let previous = slot.replace(child_id);
            if previous != Some(child_id) {
                maybe_render(store, composite)?;
            }
            attachment
        }
        Instance::Object {
            tag: TypeTag::Scene,
            id,
        } => {
            if !child_tag.is_scene_node() {
                log::debug!("{} cannot be a scene child", child_tag);
                return Ok(Attachment::Ignored);
            }
            if before.is_some() {
                log::debug!("Sibling position ignored for scene child {:?}", child_id);
            }
            store.scene_mut(*id)?.add(child_id);
            Attachment::SceneChild
        }
        Instance::Object {
            tag:
                TypeTag::BoxGeometry
                | TypeTag::MeshBasicMaterial
                | TypeTag::PerspectiveCamera
                | TypeTag::WebGlRenderer,
            ..
        }
        | Instance::Null => Attachment::Ignored,
    };

    if attachment == Attachment::Ignored {
        log::debug!("Ignored attach of {} under {:?}", child_tag, parent.tag());
    }
    Ok(attachment)
}

/// Undo an [`attach`]; never renders
pub fn detach(
    store: &mut ObjectStore,
    parent: &mut Instance,
    child: &Instance,
) -> Result<Attachment> {
    let Some(child_tag) = child.tag() else {
        return Ok(Attachment::Ignored);
    };
    let Some(child_id) = child.object_id() else {
        return Ok(Attachment::Ignored);
    };

    let attachment = match parent {
        Instance::Object {
            tag: TypeTag::Mesh,
            id,
        } => {
            let mesh = store.mesh_mut(*id)?;
            match child_tag {
                TypeTag::BoxGeometry => {
                    clear_slot(&mut mesh.geometry, child_id);
                    Attachment::MeshGeometry
                }
                TypeTag::MeshBasicMaterial => {
                    clear_slot(&mut mesh.material, child_id);
                    Attachment::MeshMaterial
                }
                _ => Attachment::Ignored,
            }
        }
        Instance::Renderer(composite) => match child_tag {
            TypeTag::Scene => {
                clear_slot(&mut composite.scene, child_id);
                Attachment::RendererScene
            }
            TypeTag::PerspectiveCamera => {
                clear_slot(&mut composite.camera, child_id);
                Attachment::RendererCamera
            }
            _ => Attachment::Ignored,
        },
        Instance::Object {
            tag: TypeTag::Scene,
            id,
        } => {
            if store.scene_mut(*id)?.remove(child_id) {
                Attachment::SceneChild
            } else {
                Attachment::Ignored
            }
        }
        Instance::Object { .. } | Instance::Null => Attachment::Ignored,
    };
    Ok(attachment)
}

/// Clear a slot only if it still holds `child`
fn clear_slot(slot: &mut Option<ObjectId>, child: ObjectId) {
    if *slot == Some(child) {
        *slot = None;
    }
}

/// Mount a top-level instance's presentation surface into the container
pub fn attach_to_container(
    container: &mut Container,
    child: &Instance,
    before: Option<&Instance>,
) -> Result<Attachment> {
    let Some(surface) = child.surface() else {
        log::warn!("{:?} has no surface to mount into the container", child.tag());
        return Ok(Attachment::Ignored);
    };
    match before.and_then(Instance::surface) {
        Some(sibling) => container.insert_before(surface, sibling)?,
        None => container.append_child(surface),
    }
    Ok(Attachment::Surface)
}

/// Remove a top-level instance's presentation surface from the container
pub fn detach_from_container(container: &mut Container, child: &Instance) -> Result<Attachment> {
    let Some(surface) = child.surface() else {
        return Ok(Attachment::Ignored);
    };
    container.remove_child(surface)?;
    Ok(Attachment::Surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::factory::create_instance;
    use crate::value::{Props, Value};

    fn make(store: &mut ObjectStore, tag: TypeTag) -> Instance {
        let props: Props = match tag {
            TypeTag::Mesh => Element::new(tag.name())
                .prop("rotation", [("x", 0.0)].into_iter().collect::<Value>())
                .props,
            TypeTag::PerspectiveCamera => Element::new(tag.name())
                .prop("position", [("z", 5.0)].into_iter().collect::<Value>())
                .props,
            TypeTag::WebGlRenderer => Element::new(tag.name())
                .prop("width", 300)
                .prop("height", 300)
                .props,
            _ => Props::new(),
        };
        create_instance(store, tag, &props).unwrap()
    }

    fn frames(store: &ObjectStore, renderer: &Instance) -> u64 {
        let id = renderer.as_renderer().unwrap().renderer;
        store.renderer(id).unwrap().info().frames
    }

    #[test]
    fn test_camera_then_scene_renders_once() {
        let mut store = ObjectStore::new();
        let mut renderer = make(&mut store, TypeTag::WebGlRenderer);
        let camera = make(&mut store, TypeTag::PerspectiveCamera);
        let scene = make(&mut store, TypeTag::Scene);

        attach(&mut store, &mut renderer, &camera, None).unwrap();
        assert_eq!(frames(&store, &renderer), 0);
        attach(&mut store, &mut renderer, &scene, None).unwrap();
        assert_eq!(frames(&store, &renderer), 1);

        let info = store
            .renderer(renderer.as_renderer().unwrap().renderer)
            .unwrap()
            .info()
            .clone();
        assert_eq!(info.last_scene, scene.object_id());
        assert_eq!(info.last_camera, camera.object_id());
    }

    #[test]
    fn test_scene_then_camera_renders_once() {
        let mut store = ObjectStore::new();
        let mut renderer = make(&mut store, TypeTag::WebGlRenderer);
        let camera = make(&mut store, TypeTag::PerspectiveCamera);
        let scene = make(&mut store, TypeTag::Scene);

        assert_eq!(
            attach(&mut store, &mut renderer, &scene, None).unwrap(),
            Attachment::RendererScene
        );
        assert_eq!(frames(&store, &renderer), 0);
        assert_eq!(
            attach(&mut store, &mut renderer, &camera, None).unwrap(),
            Attachment::RendererCamera
        );
        assert_eq!(frames(&store, &renderer), 1);
    }

    #[test]
    fn test_reattach_same_pair_renders_once_more() {
        let mut store = ObjectStore::new();
        let mut renderer = make(&mut store, TypeTag::WebGlRenderer);
        let camera = make(&mut store, TypeTag::PerspectiveCamera);
        let scene = make(&mut store, TypeTag::Scene);
        attach(&mut store, &mut renderer, &scene, None).unwrap();
        attach(&mut store, &mut renderer, &camera, None).unwrap();

        detach(&mut store, &mut renderer, &scene).unwrap();
        assert!(renderer.as_renderer().unwrap().scene.is_none());
        assert_eq!(frames(&store, &renderer), 1);

        attach(&mut store, &mut renderer, &scene, None).unwrap();
        assert_eq!(frames(&store, &renderer), 2);

        // Same pair again: slot content unchanged, nothing to redraw
        attach(&mut store, &mut renderer, &scene, None).unwrap();
        assert_eq!(frames(&store, &renderer), 2);
    }

    #[test]
    fn test_reattach_camera_renders_once_more() {
        let mut store = ObjectStore::new();
        let mut renderer = make(&mut store, TypeTag::WebGlRenderer);
        let camera = make(&mut store, TypeTag::PerspectiveCamera);
        let scene = make(&mut store, TypeTag::Scene);
        attach(&mut store, &mut renderer, &scene, None).unwrap();
        attach(&mut store, &mut renderer, &camera, None).unwrap();
        assert_eq!(frames(&store, &renderer), 1);

        let detached = detach(&mut store, &mut renderer, &camera).unwrap();
        assert_eq!(detached, Attachment::RendererCamera);
        assert!(renderer.as_renderer().unwrap().camera.is_none());
        assert_eq!(frames(&store, &renderer), 1);

        attach(&mut store, &mut renderer, &camera, None).unwrap();
        assert_eq!(frames(&store, &renderer), 2);

        attach(&mut store, &mut renderer, &camera, None).unwrap();
        assert_eq!(frames(&store, &renderer), 2);
    }

    #[test]
    fn test_geometry_slot_overwrites() {
        let mut store = ObjectStore::new();
        let mut mesh = make(&mut store, TypeTag::Mesh);
        let first = make(&mut store, TypeTag::BoxGeometry);
        let second = make(&mut store, TypeTag::BoxGeometry);

        attach(&mut store, &mut mesh, &first, None).unwrap();
        attach(&mut store, &mut mesh, &second, None).unwrap();
        let mesh_id = mesh.object_id().unwrap();
        assert_eq!(store.mesh(mesh_id).unwrap().geometry, second.object_id());

        // Detaching the overwritten geometry leaves the current one in place
        detach(&mut store, &mut mesh, &first).unwrap();
        assert_eq!(store.mesh(mesh_id).unwrap().geometry, second.object_id());
        detach(&mut store, &mut mesh, &second).unwrap();
        assert_eq!(store.mesh(mesh_id).unwrap().geometry, None);
    }

    #[test]
    fn test_scene_edges() {
        let mut store = ObjectStore::new();
        let mut scene = make(&mut store, TypeTag::Scene);
        let mesh = make(&mut store, TypeTag::Mesh);
        let material = make(&mut store, TypeTag::MeshBasicMaterial);

        assert_eq!(attach(&mut store, &mut scene, &mesh, None).unwrap(), Attachment::SceneChild);
        assert_eq!(attach(&mut store, &mut scene, &material, None).unwrap(), Attachment::Ignored);
        let scene_id = scene.object_id().unwrap();
        assert_eq!(store.scene(scene_id).unwrap().children(), &[mesh.object_id().unwrap()]);

        assert_eq!(detach(&mut store, &mut scene, &mesh).unwrap(), Attachment::SceneChild);
        assert!(store.scene(scene_id).unwrap().children().is_empty());
    }

    #[test]
    fn test_null_instances_are_ignored() {
        let mut store = ObjectStore::new();
        let mut null = Instance::Null;
        let mut mesh = make(&mut store, TypeTag::Mesh);

        assert_eq!(attach(&mut store, &mut null, &mesh, None).unwrap(), Attachment::Ignored);
        let attachment = attach(&mut store, &mut mesh, &Instance::Null, None).unwrap();
        assert_eq!(attachment, Attachment::Ignored);
        assert_eq!(detach(&mut store, &mut mesh, &Instance::Null).unwrap(), Attachment::Ignored);
    }

    #[test]
    fn test_container_mount() {
        let mut store = ObjectStore::new();
        let mut container = Container::new();
        let first = make(&mut store, TypeTag::WebGlRenderer);
        let second = make(&mut store, TypeTag::WebGlRenderer);
        let scene = make(&mut store, TypeTag::Scene);

        attach_to_container(&mut container, &first, None).unwrap();
        attach_to_container(&mut container, &second, Some(&first)).unwrap();
        assert_eq!(
            container.children(),
            &[second.surface().unwrap(), first.surface().unwrap()]
        );
        assert_eq!(attach_to_container(&mut container, &scene, None).unwrap(), Attachment::Ignored);

        detach_from_container(&mut container, &second).unwrap();
        assert_eq!(container.children(), &[first.surface().unwrap()]);
    }
}
