//! Generational arena owning every retained object

use crate::error::{Result, SceneError};
use crate::id::ObjectId;
use crate::object::{
    BoxGeometry, Mesh, MeshBasicMaterial, Object, ObjectKind, PerspectiveCamera, Scene,
};
use crate::renderer::Renderer;

#[derive(Debug)]
struct Slot {
    generation: u32,
    object: Option<Object>,
}

/// Owns retained objects and hands out [`ObjectId`]s to them
#[derive(Debug)]
pub struct ObjectStore {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
}

/// Generates a shared and a mutable typed accessor for one object kind
macro_rules! typed_access {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Borrow a `", stringify!($variant), "` by handle")]
        pub fn $get(&self, id: ObjectId) -> Result<&$ty> {
            match self.get(id)? {
                Object::$variant(o) => Ok(o),
                other => Err(SceneError::WrongKind {
                    id,
                    expected: ObjectKind::$variant,
                    found: other.kind(),
                }),
            }
        }

        #[doc = concat!("Mutably borrow a `", stringify!($variant), "` by handle")]
        pub fn $get_mut(&mut self, id: ObjectId) -> Result<&mut $ty> {
            match self.get_mut(id)? {
                Object::$variant(o) => Ok(o),
                other => Err(SceneError::WrongKind {
                    id,
                    expected: ObjectKind::$variant,
                    found: other.kind(),
                }),
            }
        }
    };
}

impl ObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Take ownership of an object
    pub fn insert(&mut self, object: Object) -> ObjectId {
        self.len += 1;
        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.object = Some(object);
            ObjectId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                object: Some(object),
            });
            ObjectId::new(index, 0)
        }
    }

    /// Release an object; its handle becomes stale
    pub fn remove(&mut self, id: ObjectId) -> Result<Object> {
        let slot = self
            .slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .ok_or(SceneError::StaleObject(id))?;
        let object = slot.object.take().ok_or(SceneError::StaleObject(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(id.index());
        self.len -= 1;
        Ok(object)
    }

    /// Borrow any object
    pub fn get(&self, id: ObjectId) -> Result<&Object> {
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.object.as_ref())
            .ok_or(SceneError::StaleObject(id))
    }

    /// Mutably borrow any object
    pub fn get_mut(&mut self, id: ObjectId) -> Result<&mut Object> {
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.object.as_mut())
            .ok_or(SceneError::StaleObject(id))
    }

    /// Check if a handle is live
    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_ok()
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    typed_access!(geometry, geometry_mut, BoxGeometry, BoxGeometry);
    typed_access!(material, material_mut, MeshBasicMaterial, MeshBasicMaterial);
    typed_access!(mesh, mesh_mut, Mesh, Mesh);
    typed_access!(scene, scene_mut, Scene, Scene);
    typed_access!(camera, camera_mut, PerspectiveCamera, PerspectiveCamera);
    typed_access!(renderer, renderer_mut, Renderer, Renderer);
}

impl Default for ObjectStore {
    fn default() -> Self {
        Self::new()
    }
}
