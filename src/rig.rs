//! Camera rig
//!
//! The rig is the theater's frame of reference: the camera node the view is
//! taken from, the simulated field of view, which axes of root movement the
//! rig absorbs, and which controller is the root.

use bevy_ecs::entity::Entity;
use glam::Vec3;

use crate::controller::ControllerId;
use crate::error::TheaterError;
use crate::projection::ViewParams;
use crate::scene::SceneGraph;
use crate::TheaterConfig;

pub const MIN_FIELD_OF_VIEW: f32 = 0.0;
pub const MAX_FIELD_OF_VIEW: f32 = 180.0;
pub const DEFAULT_FIELD_OF_VIEW: f32 = 60.0;

/// Per-axis lock flags
///
/// A locked axis means root movement along it is absorbed by the rig: the
/// root stays put on screen and every other node moves the opposite way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisLocks {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisLocks {
    pub const NONE: Self = Self::new(false, false, false);
    pub const ALL: Self = Self::new(true, true, true);

    pub const fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    pub fn any(&self) -> bool {
        self.x || self.y || self.z
    }

    /// Movement the rest of the world takes when the root holds `offset`:
    /// the negated offset on locked axes, zero elsewhere.
    pub fn counter_movement(&self, offset: Vec3) -> Vec3 {
        Vec3::new(
            if self.x { -offset.x } else { 0.0 },
            if self.y { -offset.y } else { 0.0 },
            if self.z { -offset.z } else { 0.0 },
        )
    }

    /// `offset` with every locked axis zeroed
    pub fn release(&self, offset: Vec3) -> Vec3 {
        Vec3::new(
            if self.x { 0.0 } else { offset.x },
            if self.y { 0.0 } else { offset.y },
            if self.z { 0.0 } else { offset.z },
        )
    }
}

/// Camera rig configuration
#[derive(Debug, Clone)]
pub struct CameraRig {
    camera: Entity,
    field_of_view: f32,
    axis_locks: AxisLocks,
    root: Option<ControllerId>,
}

impl CameraRig {
    /// Rig viewing from `camera` with default settings and no root yet
    pub fn new(camera: Entity) -> Self {
        Self::from_config(camera, &TheaterConfig::default())
    }

    pub fn from_config(camera: Entity, config: &TheaterConfig) -> Self {
        let mut rig = Self {
            camera,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            axis_locks: config.axis_locks,
            root: None,
        };
        rig.set_field_of_view(config.field_of_view);
        rig
    }

    pub fn camera(&self) -> Entity {
        self.camera
    }

    pub fn set_camera(&mut self, camera: Entity) {
        self.camera = camera;
    }

    /// Simulated field of view in degrees
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// Set the field of view, clamped to `[0, 180]` degrees
    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.field_of_view = degrees.clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW);
    }

    pub fn axis_locks(&self) -> AxisLocks {
        self.axis_locks
    }

    pub fn set_axis_locks(&mut self, locks: AxisLocks) {
        self.axis_locks = locks;
    }

    pub fn is_x_locked(&self) -> bool {
        self.axis_locks.x
    }

    pub fn set_x_locked(&mut self, locked: bool) {
        self.axis_locks.x = locked;
    }

    pub fn is_y_locked(&self) -> bool {
        self.axis_locks.y
    }

    pub fn set_y_locked(&mut self, locked: bool) {
        self.axis_locks.y = locked;
    }

    pub fn is_z_locked(&self) -> bool {
        self.axis_locks.z
    }

    pub fn set_z_locked(&mut self, locked: bool) {
        self.axis_locks.z = locked;
    }

    /// The designated root controller, if one has been assigned
    pub fn root(&self) -> Option<ControllerId> {
        self.root
    }

    /// Handles are checked by the theater before they get here
    pub(crate) fn set_root(&mut self, root: ControllerId) {
        self.root = Some(root);
    }

    /// Current view, or `None` if the camera node or its camera is missing
    pub fn view(&self, scene: &dyn SceneGraph) -> Option<ViewParams> {
        let viewpoint = scene.world_position(self.camera)?;
        let half_height = scene.orthographic_half_height(self.camera)?;
        Some(ViewParams::new(viewpoint, half_height, self.field_of_view))
    }

    pub fn orthographic_half_height(&self, scene: &dyn SceneGraph) -> Option<f32> {
        scene.orthographic_half_height(self.camera)
    }

    pub fn set_orthographic_half_height(&self, scene: &mut dyn SceneGraph, half_height: f32) {
        scene.set_orthographic_half_height(self.camera, half_height);
    }

    /// Everything wrong with the rig setup, in no particular order
    pub fn configuration_errors(&self, scene: &dyn SceneGraph) -> Vec<TheaterError> {
        let mut errors = Vec::new();
        if self.root.is_none() {
            errors.push(TheaterError::InvalidConfiguration(
                "no root controller assigned to the camera rig".into(),
            ));
        }
        if scene.orthographic_half_height(self.camera).is_none() {
            errors.push(TheaterError::InvalidConfiguration(format!(
                "camera node {:?} has no orthographic camera",
                self.camera
            )));
        }
        errors
    }
}
