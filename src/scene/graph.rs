//! Host scene graph access

use bevy_ecs::prelude::*;
use glam::Vec3;

use super::{OrthographicCamera, Transform};

/// World-space access to the host's nodes and camera
///
/// The theater never owns node transforms. It reads the original positions
/// at activation and writes corrected positions back through this trait.
pub trait SceneGraph {
    /// World position of `node`, or `None` if the node is gone
    fn world_position(&self, node: Entity) -> Option<Vec3>;

    /// Overwrite the world position of `node`. Missing nodes are ignored.
    fn set_world_position(&mut self, node: Entity, position: Vec3);

    /// Orthographic half-height of the camera on `camera`, if it has one
    fn orthographic_half_height(&self, camera: Entity) -> Option<f32>;

    /// Change the orthographic half-height. Ignored if `camera` has no camera.
    fn set_orthographic_half_height(&mut self, camera: Entity, half_height: f32);
}

impl SceneGraph for World {
    fn world_position(&self, node: Entity) -> Option<Vec3> {
        self.get::<Transform>(node).map(|t| t.position)
    }

    fn set_world_position(&mut self, node: Entity, position: Vec3) {
        if let Some(mut transform) = self.get_mut::<Transform>(node) {
            transform.position = position;
        }
    }

    fn orthographic_half_height(&self, camera: Entity) -> Option<f32> {
        self.get::<OrthographicCamera>(camera).map(|c| c.half_height)
    }

    fn set_orthographic_half_height(&mut self, camera: Entity, half_height: f32) {
        if let Some(mut ortho) = self.get_mut::<OrthographicCamera>(camera) {
            ortho.half_height = half_height;
        }
    }
}
