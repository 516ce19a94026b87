//! Entity position controllers
//!
//! One controller per node taking part in the theater. A controller tracks
//! its node's offset from the root's original position; the [`Theater`]
//! turns that offset into a corrected position every tick and hands it to
//! the controller's [`Placement`].
//!
//! [`Theater`]: crate::Theater

mod backdrop;

pub use backdrop::*;

use bevy_ecs::entity::Entity;
use glam::Vec3;

use crate::scene::SceneGraph;

/// Handle to a controller owned by a [`Theater`](crate::Theater)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(pub(crate) u32);

impl ControllerId {
    pub fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Inactive,
    /// Inside an activation call; already counts as enabled
    Activating,
    /// Recomputed on every fixed tick
    Settled,
}

/// How a controller applies its corrected position
#[derive(Debug, Clone)]
pub enum Placement {
    /// Write the position straight to the controller's node
    Entity,
    /// Tile sub-elements around a box
    Backdrop(BackdropTiling),
}

impl Placement {
    pub(crate) fn perform_position_update(
        &mut self,
        node: Entity,
        original_position: Vec3,
        position: Vec3,
        scene: &mut dyn SceneGraph,
    ) {
        match self {
            Placement::Entity => scene.set_world_position(node, position),
            Placement::Backdrop(backdrop) => {
                backdrop.perform_position_update(original_position, position, scene)
            }
        }
    }
}

/// Per-node offset tracking state
#[derive(Debug, Clone)]
pub struct EntityController {
    node: Entity,
    pub(crate) phase: Phase,
    pub(crate) original_position: Vec3,
    pub(crate) relative_offset: Vec3,
    pub(crate) placement: Placement,
}

impl EntityController {
    pub fn new(node: Entity, placement: Placement) -> Self {
        Self {
            node,
            phase: Phase::Inactive,
            original_position: Vec3::ZERO,
            relative_offset: Vec3::ZERO,
            placement,
        }
    }

    pub fn node(&self) -> Entity {
        self.node
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Enabled controllers take part in broadcasts and re-anchoring
    pub fn is_enabled(&self) -> bool {
        self.phase != Phase::Inactive
    }

    /// World position of the node when it was last activated
    pub fn original_position(&self) -> Vec3 {
        self.original_position
    }

    /// Displacement from the root's original position
    pub fn relative_offset(&self) -> Vec3 {
        self.relative_offset
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn backdrop(&self) -> Option<&BackdropTiling> {
        match &self.placement {
            Placement::Backdrop(backdrop) => Some(backdrop),
            Placement::Entity => None,
        }
    }

    pub fn backdrop_mut(&mut self) -> Option<&mut BackdropTiling> {
        match &mut self.placement {
            Placement::Backdrop(backdrop) => Some(backdrop),
            Placement::Entity => None,
        }
    }

    pub(crate) fn perform_position_update(&mut self, position: Vec3, scene: &mut dyn SceneGraph) {
        let node = self.node;
        let original = self.original_position;
        self.placement
            .perform_position_update(node, original, position, scene);
    }
}
