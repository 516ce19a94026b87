//! Puppet Theater - camera-relative parallax for orthographic scenes
//!
//! A designated root node defines the camera rig's frame of reference.
//! Every other node keeps a fixed offset from the root and is re-projected
//! each fixed tick so that it shifts as if seen through a perspective
//! camera, while the scene still renders orthographically.
//!
//! # Features
//! - Perspective correction of flat offsets ([`projection`])
//! - Root/dependent offset tracking with per-axis locking ([`Theater`])
//! - Infinitely scrolling backdrops tiled around a box ([`BackdropTiling`])
//! - Host integration through `bevy_ecs` ([`systems`])

pub mod controller;
pub mod error;
pub mod projection;
pub mod rig;
pub mod scene;
pub mod systems;
pub mod theater;

pub use controller::{BackdropTiling, ControllerId, EntityController, Phase, Placement};
pub use error::{TheaterError, TheaterResult};
pub use projection::{project, ViewParams};
pub use rig::{AxisLocks, CameraRig};
pub use scene::{OrthographicCamera, SceneGraph, Transform};
pub use theater::Theater;

/// Offsets with a squared length at or below this are treated as zero
pub const OFFSET_EPSILON: f32 = f32::EPSILON;

/// Configuration for a theater and its camera rig
#[derive(Debug, Clone)]
pub struct TheaterConfig {
    /// Simulated field of view in degrees, clamped to `[0, 180]`
    pub field_of_view: f32,
    /// Axes along which root movement is absorbed by the rig
    pub axis_locks: AxisLocks,
    /// Squared offset length below which no correction happens
    pub offset_epsilon: f32,
}

impl Default for TheaterConfig {
    fn default() -> Self {
        Self {
            field_of_view: rig::DEFAULT_FIELD_OF_VIEW,
            axis_locks: AxisLocks::NONE,
            offset_epsilon: OFFSET_EPSILON,
        }
    }
}

impl TheaterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field_of_view(mut self, degrees: f32) -> Self {
        self.field_of_view = degrees;
        self
    }

    pub fn with_axis_locks(mut self, locks: AxisLocks) -> Self {
        self.axis_locks = locks;
        self
    }

    pub fn with_offset_epsilon(mut self, epsilon: f32) -> Self {
        self.offset_epsilon = epsilon;
        self
    }
}
