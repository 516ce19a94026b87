//! Camera component

use bevy_ecs::prelude::*;

/// Orthographic camera attached to the rig's camera node
///
/// The theater fakes perspective on top of this projection, so the
/// half-height is the only parameter it reads.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrthographicCamera {
    /// Half of the vertical extent of the view volume, in world units
    pub half_height: f32,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self { half_height: 5.0 }
    }
}

impl OrthographicCamera {
    pub fn new(half_height: f32) -> Self {
        Self { half_height }
    }
}
