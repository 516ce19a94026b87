//! Backdrop tiling
//!
//! A backdrop controller does not move its own node. It slides a set of
//! sub-element nodes by the controller's displacement and wraps each one
//! around a box, so tiles leaving one face re-enter from the opposite one.

use bevy_ecs::entity::Entity;
use glam::Vec3;

use crate::scene::SceneGraph;

/// Smallest tiling period used on any axis
pub const TILE_EPSILON: f32 = f32::EPSILON;

/// Non-negative remainder of `value` modulo `period`, in `[0, period)`
///
/// Floored rather than truncated, so negative values wrap as well. A
/// remainder that rounds up to `period` wraps to zero.
pub fn repeat(value: f32, period: f32) -> f32 {
    let wrapped = value - (value / period).floor() * period;
    if wrapped >= period {
        0.0
    } else {
        wrapped.max(0.0)
    }
}

/// Original sub-element positions, captured from the scene
#[derive(Debug, Clone, Default, PartialEq)]
struct SubElementCache {
    /// `None` for sub-elements that had no node when captured
    positions: Vec<Option<Vec3>>,
    center: Vec3,
}

impl SubElementCache {
    fn capture(sub_elements: &[Entity], scene: &dyn SceneGraph) -> Self {
        let positions: Vec<Option<Vec3>> = sub_elements
            .iter()
            .map(|&node| scene.world_position(node))
            .collect();
        let mut sum = Vec3::ZERO;
        let mut count = 0u32;
        for position in positions.iter().flatten() {
            sum += *position;
            count += 1;
        }
        let center = if count > 0 { sum / count as f32 } else { Vec3::ZERO };
        Self { positions, center }
    }
}

/// Backdrop tiling state
#[derive(Debug, Clone, Default)]
pub struct BackdropTiling {
    size: Vec3,
    sub_elements: Vec<Entity>,
    cache: Option<SubElementCache>,
}

impl BackdropTiling {
    /// Backdrop tiling `sub_elements` with an unclamped initial size
    ///
    /// Use [`BackdropTiling::set_size`] once the sub-elements exist in the
    /// scene to get a size that respects [`BackdropTiling::minimal_size`].
    pub fn new(sub_elements: &[Entity], size: Vec3) -> Self {
        Self {
            size,
            sub_elements: sub_elements.to_vec(),
            cache: None,
        }
    }

    /// Tiling period per axis
    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Set the tiling period, raised per axis to at least the minimal size
    pub fn set_size(&mut self, size: Vec3, scene: &dyn SceneGraph) {
        self.size = size.max(self.minimal_size(scene));
    }

    pub fn sub_elements(&self) -> &[Entity] {
        &self.sub_elements
    }

    /// Replace the sub-elements with a copy of `sub_elements`
    ///
    /// Cached original positions are only dropped when the count changes;
    /// call [`BackdropTiling::refresh`] after swapping in a same-sized set.
    pub fn set_sub_elements(&mut self, sub_elements: &[Entity]) {
        self.sub_elements = sub_elements.to_vec();
    }

    /// Largest per-axis distance between any two sub-element originals
    pub fn minimal_size(&mut self, scene: &dyn SceneGraph) -> Vec3 {
        self.ensure_cache(scene);
        let Some(cache) = &self.cache else {
            return Vec3::ZERO;
        };
        let mut minimal = Vec3::ZERO;
        for (i, a) in cache.positions.iter().enumerate() {
            let Some(a) = a else { continue };
            for (j, b) in cache.positions.iter().enumerate() {
                if i == j {
                    continue;
                }
                if let Some(b) = b {
                    minimal = minimal.max((*b - *a).abs());
                }
            }
        }
        minimal
    }

    /// Cached original positions, in sub-element order
    pub fn original_sub_positions(&mut self, scene: &dyn SceneGraph) -> &[Option<Vec3>] {
        self.ensure_cache(scene);
        self.cache
            .as_ref()
            .map(|c| c.positions.as_slice())
            .unwrap_or_default()
    }

    /// Mean of the cached original positions
    pub fn center_position(&mut self, scene: &dyn SceneGraph) -> Vec3 {
        self.ensure_cache(scene);
        self.cache.as_ref().map_or(Vec3::ZERO, |c| c.center)
    }

    /// Recapture original positions from the scene
    pub fn refresh(&mut self, scene: &dyn SceneGraph) {
        self.cache = Some(SubElementCache::capture(&self.sub_elements, scene));
    }

    fn ensure_cache(&mut self, scene: &dyn SceneGraph) {
        let stale = self
            .cache
            .as_ref()
            .map_or(true, |c| c.positions.len() != self.sub_elements.len());
        if stale {
            self.refresh(scene);
        }
    }

    /// Tile every sub-element for a backdrop whose node would now sit at
    /// `position`, having started at `original_position`.
    pub fn perform_position_update(
        &mut self,
        original_position: Vec3,
        position: Vec3,
        scene: &mut dyn SceneGraph,
    ) {
        self.ensure_cache(&*scene);
        let Some(cache) = &self.cache else {
            return;
        };
        let top_left_behind = cache.center - self.size * 0.5;
        let relative = position - original_position;
        let period = self.size.max(Vec3::splat(TILE_EPSILON));

        for (&node, original) in self.sub_elements.iter().zip(&cache.positions) {
            let Some(original) = original else { continue };
            if scene.world_position(node).is_none() {
                continue;
            }
            let shifted = *original + relative - top_left_behind;
            let wrapped = Vec3::new(
                repeat(shifted.x, period.x),
                repeat(shifted.y, period.y),
                repeat(shifted.z, period.z),
            );
            scene.set_world_position(node, wrapped + top_left_behind);
        }
    }
}
