//! The screen that renderer surfaces are mounted into

use crate::error::{Result, SceneError};
use crate::id::SurfaceId;

/// Ordered set of mounted surfaces, front-most last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    children: Vec<SurfaceId>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a surface at the end; an already mounted surface is moved
    pub fn append_child(&mut self, surface: SurfaceId) {
        self.children.retain(|s| *s != surface);
        self.children.push(surface);
    }

    /// Mount a surface in front of `before`
    pub fn insert_before(&mut self, surface: SurfaceId, before: SurfaceId) -> Result<()> {
        if surface == before {
            return Ok(());
        }
        self.children.retain(|s| *s != surface);
        let index = self
            .children
            .iter()
            .position(|s| *s == before)
            .ok_or(SceneError::SurfaceNotInContainer(before))?;
        self.children.insert(index, surface);
        Ok(())
    }

    /// Unmount a surface
    pub fn remove_child(&mut self, surface: SurfaceId) -> Result<()> {
        let index = self
            .children
            .iter()
            .position(|s| *s == surface)
            .ok_or(SceneError::SurfaceNotInContainer(surface))?;
        self.children.remove(index);
        Ok(())
    }

    pub fn contains(&self, surface: SurfaceId) -> bool {
        self.children.contains(&surface)
    }

    pub fn children(&self) -> &[SurfaceId] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_insert_remove() {
        let mut container = Container::new();
        let a = SurfaceId::new();
        let b = SurfaceId::new();
        container.append_child(a);
        container.insert_before(b, a).unwrap();
        assert_eq!(container.children(), &[b, a]);

        container.remove_child(b).unwrap();
        assert_eq!(container.children(), &[a]);
        assert_eq!(
            container.remove_child(b),
            Err(SceneError::SurfaceNotInContainer(b))
        );
    }

    #[test]
    fn test_insert_before_unknown_sibling() {
        let mut container = Container::new();
        let a = SurfaceId::new();
        let missing = SurfaceId::new();
        assert!(container.insert_before(a, missing).is_err());
        assert!(container.is_empty());
    }
}
