//! Renderer and its drawing surface
//!
//! The renderer does not rasterize anything. A render walks the scene
//! graph, counts the draw calls it would issue and records them in
//! [`RenderInfo`], which is what callers observe.

use crate::error::{Result, SceneError};
use crate::id::{ObjectId, SurfaceId};
use crate::object::Object;
use crate::store::ObjectStore;
use std::collections::HashSet;

/// Drawing surface owned by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub id: SurfaceId,
    pub width: u32,
    pub height: u32,
}

impl Surface {
    fn new(width: u32, height: u32) -> Self {
        Self {
            id: SurfaceId::new(),
            width,
            height,
        }
    }
}

/// Construction options for a renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererParameters {
    pub antialias: bool,
}

/// Statistics of the renders issued so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderInfo {
    /// Number of completed renders
    pub frames: u64,
    /// Draw calls issued by the last render
    pub last_draw_calls: usize,
    pub last_scene: Option<ObjectId>,
    pub last_camera: Option<ObjectId>,
}

/// Renders scenes onto its surface
#[derive(Debug, Clone)]
pub struct Renderer {
    surface: Surface,
    antialias: bool,
    info: RenderInfo,
}

impl Renderer {
    /// Create a renderer with a default 300x150 surface
    pub fn new(parameters: RendererParameters) -> Self {
        Self {
            surface: Surface::new(300, 150),
            antialias: parameters.antialias,
            info: RenderInfo::default(),
        }
    }

    /// Resize the drawing surface
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidSurfaceSize { width, height });
        }
        self.surface.width = width;
        self.surface.height = height;
        Ok(())
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn antialias(&self) -> bool {
        self.antialias
    }

    pub fn info(&self) -> &RenderInfo {
        &self.info
    }

    fn submit(&mut self, frame: Frame) -> RenderInfo {
        self.info.frames += 1;
        self.info.last_draw_calls = frame.draw_calls;
        self.info.last_scene = Some(frame.scene);
        self.info.last_camera = Some(frame.camera);
        log::debug!(
            "Rendered frame {} ({} draw calls, surface {}x{})",
            self.info.frames,
            frame.draw_calls,
            self.surface.width,
            self.surface.height
        );
        self.info.clone()
    }
}

/// A validated scene/camera pair ready to be drawn
struct Frame {
    scene: ObjectId,
    camera: ObjectId,
    draw_calls: usize,
}

impl Frame {
    fn collect(store: &ObjectStore, scene: ObjectId, camera: ObjectId) -> Result<Self> {
        store.camera(camera)?.validate()?;
        store.scene(scene)?;

        let mut draw_calls = 0;
        let mut visited = HashSet::new();
        let mut pending = vec![scene];
        while let Some(id) = pending.pop() {
            if !visited.insert(id) {
                continue;
            }
            match store.get(id)? {
                Object::Scene(s) => pending.extend(s.children().iter().rev()),
                Object::Mesh(mesh) => {
                    if let (Some(geometry), Some(material)) = (mesh.geometry, mesh.material) {
                        store.geometry(geometry)?;
                        if store.material(material)?.visible {
                            draw_calls += 1;
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            scene,
            camera,
            draw_calls,
        })
    }
}

impl ObjectStore {
    /// Render `scene` through `camera` with the given renderer
    pub fn render(
        &mut self,
        renderer: ObjectId,
        scene: ObjectId,
        camera: ObjectId,
    ) -> Result<RenderInfo> {
        let frame = Frame::collect(self, scene, camera)?;
        Ok(self.renderer_mut(renderer)?.submit(frame))
    }
}
