//! Theater orchestrator
//!
//! Owns the camera rig and every controller, and drives the offset
//! protocol between them:
//!
//! - activation captures a node's original position and anchors its offset
//!   to the root (or re-anchors everyone else when the root itself
//!   activates)
//! - every fixed tick recomputes each settled controller, since the camera
//!   may have moved even when no offset changed
//! - the root absorbs movement on locked axes and pushes the opposite
//!   movement to all other enabled controllers, one level deep

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::controller::{BackdropTiling, ControllerId, EntityController, Phase, Placement};
use crate::error::{TheaterError, TheaterResult};
use crate::projection::project;
use crate::rig::CameraRig;
use crate::scene::SceneGraph;
use crate::TheaterConfig;

/// The theater: camera rig plus all of its controllers
#[derive(Resource, Debug)]
pub struct Theater {
    rig: Option<CameraRig>,
    controllers: Vec<EntityController>,
    offset_epsilon: f32,
}

impl Default for Theater {
    fn default() -> Self {
        Self::without_rig()
    }
}

impl Theater {
    pub fn new(rig: CameraRig) -> Self {
        Self::with_config(rig, &TheaterConfig::default())
    }

    pub fn with_config(rig: CameraRig, config: &TheaterConfig) -> Self {
        Self {
            rig: Some(rig),
            controllers: Vec::new(),
            offset_epsilon: config.offset_epsilon,
        }
    }

    /// A theater with no rig: controllers self-anchor and never correct
    pub fn without_rig() -> Self {
        Self {
            rig: None,
            controllers: Vec::new(),
            offset_epsilon: TheaterConfig::default().offset_epsilon,
        }
    }

    pub fn rig(&self) -> Option<&CameraRig> {
        self.rig.as_ref()
    }

    pub fn rig_mut(&mut self) -> Option<&mut CameraRig> {
        self.rig.as_mut()
    }

    pub fn set_rig(&mut self, rig: CameraRig) {
        self.rig = Some(rig);
    }

    pub fn take_rig(&mut self) -> Option<CameraRig> {
        self.rig.take()
    }

    /// Offsets with a squared length at or below this are left alone
    pub fn offset_epsilon(&self) -> f32 {
        self.offset_epsilon
    }

    /// Register a controller that moves `node` directly
    pub fn add_entity(&mut self, node: Entity) -> ControllerId {
        self.push(EntityController::new(node, Placement::Entity))
    }

    /// Register a backdrop controller on `node` tiling `sub_elements`
    ///
    /// `size` is clamped to the sub-elements' spread as they sit in `scene`.
    pub fn add_backdrop(
        &mut self,
        node: Entity,
        sub_elements: &[Entity],
        size: Vec3,
        scene: &dyn SceneGraph,
    ) -> ControllerId {
        let mut backdrop = BackdropTiling::new(sub_elements, size);
        backdrop.set_size(size, scene);
        self.push(EntityController::new(node, Placement::Backdrop(backdrop)))
    }

    fn push(&mut self, controller: EntityController) -> ControllerId {
        let id = ControllerId(self.controllers.len() as u32);
        self.controllers.push(controller);
        id
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn controller(&self, id: ControllerId) -> Option<&EntityController> {
        self.controllers.get(id.index())
    }

    pub fn backdrop(&self, id: ControllerId) -> Option<&BackdropTiling> {
        self.controller(id)?.backdrop()
    }

    pub fn backdrop_mut(&mut self, id: ControllerId) -> Option<&mut BackdropTiling> {
        self.controllers.get_mut(id.index())?.backdrop_mut()
    }

    /// Resize a backdrop, clamped to its minimal size
    pub fn set_backdrop_size(
        &mut self,
        id: ControllerId,
        size: Vec3,
        scene: &dyn SceneGraph,
    ) -> TheaterResult<()> {
        let backdrop = self.backdrop_mut(id).ok_or_else(|| {
            TheaterError::InvalidConfiguration(format!("controller {id:?} is not a backdrop"))
        })?;
        backdrop.set_size(size, scene);
        Ok(())
    }

    /// Every controller that is activating or settled
    pub fn enabled_controllers(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.controllers
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_enabled())
            .map(|(i, _)| ControllerId(i as u32))
    }

    /// Designate `id` as the rig's root
    ///
    /// Only plain entity controllers can be the root.
    pub fn set_root(&mut self, id: ControllerId) -> TheaterResult<()> {
        let controller = self.controllers.get(id.index()).ok_or_else(|| {
            TheaterError::InvalidConfiguration(format!("root controller {id:?} does not exist"))
        })?;
        if controller.backdrop().is_some() {
            return Err(TheaterError::InvalidConfiguration(format!(
                "backdrop controller {id:?} cannot be the root"
            )));
        }
        let rig = self.rig.as_mut().ok_or_else(|| {
            TheaterError::InvalidConfiguration("no camera rig to assign a root to".into())
        })?;
        rig.set_root(id);
        Ok(())
    }

    pub fn root(&self) -> Option<ControllerId> {
        self.rig.as_ref()?.root()
    }

    /// Check the rig setup, logging every problem found
    ///
    /// Returns whether the rig can correct positions. A misconfigured rig is
    /// not fatal: controllers keep running and simply skip correction.
    pub fn start(&self, scene: &dyn SceneGraph) -> bool {
        let Some(rig) = &self.rig else {
            log::error!("Puppet theater has no camera rig; positions will not be corrected");
            return false;
        };
        let errors = rig.configuration_errors(scene);
        for error in &errors {
            log::error!("{error}");
        }
        errors.is_empty()
    }

    pub fn relative_offset(&self, id: ControllerId) -> Option<Vec3> {
        self.controller(id).map(|c| c.relative_offset())
    }

    /// Set a controller's offset, recomputing if it changed
    pub fn set_relative_offset(
        &mut self,
        id: ControllerId,
        offset: Vec3,
        scene: &mut dyn SceneGraph,
    ) -> TheaterResult<()> {
        let index = self.index_of(id)?;
        self.assign_offset(index, offset, scene);
        Ok(())
    }

    /// Add `movement` to a controller's offset
    pub fn move_controller(
        &mut self,
        id: ControllerId,
        movement: Vec3,
        scene: &mut dyn SceneGraph,
    ) -> TheaterResult<()> {
        let index = self.index_of(id)?;
        self.move_index(index, movement, scene);
        Ok(())
    }

    /// Activate a controller from its node's current position
    pub fn activate(&mut self, id: ControllerId, scene: &mut dyn SceneGraph) -> TheaterResult<()> {
        let index = self.index_of(id)?;
        let node = self.controllers[index].node();
        let original = scene
            .world_position(node)
            .ok_or(TheaterError::MissingNode(node))?;

        let controller = &mut self.controllers[index];
        controller.phase = Phase::Activating;
        controller.original_position = original;

        match self.active_root() {
            Some(root) if root == index => {
                log::debug!("Root {id:?} activated at {original}, re-anchoring dependents");
                for other in self.enabled_indices_except(index) {
                    let rebased = self.controllers[other].relative_offset - original;
                    self.assign_offset(other, rebased, scene);
                }
            }
            Some(root) => {
                let anchor = self.controllers[root].original_position;
                self.controllers[index].relative_offset = original - anchor;
                log::debug!("Controller {id:?} activated at {original}, anchored to root");
            }
            None => {
                self.controllers[index].relative_offset = original;
                log::debug!("Controller {id:?} activated at {original} without an active root");
            }
        }

        self.recompute_index(index, scene);
        self.controllers[index].phase = Phase::Settled;
        Ok(())
    }

    /// Take a controller out of the enabled set
    ///
    /// Deactivating the root suspends correction for everyone.
    pub fn deactivate(&mut self, id: ControllerId) -> TheaterResult<()> {
        let index = self.index_of(id)?;
        self.controllers[index].phase = Phase::Inactive;
        if self.root() == Some(id) {
            log::debug!("Root {id:?} deactivated, correction suspended");
        }
        Ok(())
    }

    /// Recompute a single controller against the current camera
    pub fn recompute(&mut self, id: ControllerId, scene: &mut dyn SceneGraph) -> TheaterResult<()> {
        let index = self.index_of(id)?;
        self.recompute_index(index, scene);
        Ok(())
    }

    /// One fixed tick: recompute every settled controller
    pub fn fixed_update(&mut self, scene: &mut dyn SceneGraph) {
        for index in 0..self.controllers.len() {
            if self.controllers[index].phase == Phase::Settled {
                self.recompute_index(index, scene);
            }
        }
    }

    fn index_of(&self, id: ControllerId) -> TheaterResult<usize> {
        if id.index() < self.controllers.len() {
            Ok(id.index())
        } else {
            Err(TheaterError::UnknownController(id))
        }
    }

    fn enabled_indices_except(&self, skip: usize) -> Vec<usize> {
        self.controllers
            .iter()
            .enumerate()
            .filter(|&(i, c)| i != skip && c.is_enabled())
            .map(|(i, _)| i)
            .collect()
    }

    /// Index of the root if there is a rig with an enabled root
    fn active_root(&self) -> Option<usize> {
        let root = self.rig.as_ref()?.root()?.index();
        self.controllers
            .get(root)
            .filter(|c| c.is_enabled())
            .map(|_| root)
    }

    fn move_index(&mut self, index: usize, movement: Vec3, scene: &mut dyn SceneGraph) {
        let offset = self.controllers[index].relative_offset + movement;
        self.assign_offset(index, offset, scene);
    }

    fn assign_offset(&mut self, index: usize, offset: Vec3, scene: &mut dyn SceneGraph) {
        if self.controllers[index].relative_offset != offset {
            self.controllers[index].relative_offset = offset;
            self.recompute_index(index, scene);
        }
    }

    fn recompute_index(&mut self, index: usize, scene: &mut dyn SceneGraph) {
        let offset = self.controllers[index].relative_offset;
        if offset.length_squared() <= self.offset_epsilon {
            return;
        }
        let Some(root) = self.active_root() else {
            log::trace!("No active root, skipping correction");
            return;
        };
        let Some(rig) = &self.rig else {
            return;
        };
        let Some(view) = rig.view(&*scene) else {
            log::trace!("Camera {:?} unavailable, skipping correction", rig.camera());
            return;
        };
        let locks = rig.axis_locks();

        if root == index {
            let controller = &mut self.controllers[index];
            let counter_movement = locks.counter_movement(controller.relative_offset);
            controller.relative_offset = locks.release(controller.relative_offset);
            let target = controller.original_position + controller.relative_offset;
            controller.perform_position_update(project(target, &view), scene);

            if counter_movement != Vec3::ZERO {
                for other in self.enabled_indices_except(index) {
                    self.move_index(other, counter_movement, scene);
                }
            }
        } else {
            let target = self.controllers[root].original_position + offset;
            self.controllers[index].perform_position_update(project(target, &view), scene);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::ViewParams;
    use crate::rig::AxisLocks;
    use crate::scene::{OrthographicCamera, Transform};

    /// Scene wrapper counting position writes
    struct CountingScene {
        world: World,
        writes: usize,
    }

    impl SceneGraph for CountingScene {
        fn world_position(&self, node: Entity) -> Option<Vec3> {
            self.world.world_position(node)
        }

        fn set_world_position(&mut self, node: Entity, position: Vec3) {
            self.writes += 1;
            self.world.set_world_position(node, position);
        }

        fn orthographic_half_height(&self, camera: Entity) -> Option<f32> {
            self.world.orthographic_half_height(camera)
        }

        fn set_orthographic_half_height(&mut self, camera: Entity, half_height: f32) {
            self.world.set_orthographic_half_height(camera, half_height);
        }
    }

    fn setup() -> (World, Theater, Entity) {
        let mut world = World::new();
        let camera = world
            .spawn((Transform::from_xyz(0.0, 0.0, -10.0), OrthographicCamera::new(5.0)))
            .id();
        let theater = Theater::new(CameraRig::new(camera));
        (world, theater, camera)
    }

    fn view(world: &World, camera: Entity) -> ViewParams {
        ViewParams::new(world.world_position(camera).unwrap(), 5.0, 60.0)
    }

    #[test]
    fn root_reanchoring() {
        let (mut world, mut theater, _) = setup();
        let root_node = world.spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();
        let dep_node = world.spawn(Transform::from_xyz(5.0, 0.0, 0.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();

        theater.activate(root, &mut world).unwrap();
        theater.activate(dep, &mut world).unwrap();

        assert_eq!(theater.relative_offset(dep), Some(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(theater.relative_offset(root), Some(Vec3::ZERO));
    }

    #[test]
    fn root_activated_last_rebases_dependents() {
        let (mut world, mut theater, _) = setup();
        let root_node = world.spawn(Transform::from_xyz(2.0, 1.0, 0.0)).id();
        let dep_node = world.spawn(Transform::from_xyz(5.0, 0.0, 3.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();

        // Without an active root the dependent self-anchors
        theater.activate(dep, &mut world).unwrap();
        assert_eq!(theater.relative_offset(dep), Some(Vec3::new(5.0, 0.0, 3.0)));

        theater.activate(root, &mut world).unwrap();
        assert_eq!(theater.relative_offset(dep), Some(Vec3::new(3.0, -1.0, 3.0)));
    }

    #[test]
    fn dependent_is_projected_from_root_origin() {
        let (mut world, mut theater, camera) = setup();
        let root_node = world.spawn(Transform::from_xyz(1.0, 0.0, 0.0)).id();
        let dep_node = world.spawn(Transform::from_xyz(6.0, 2.0, 4.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();
        theater.activate(dep, &mut world).unwrap();

        let expected = project(Vec3::new(6.0, 2.0, 4.0), &view(&world, camera));
        assert_eq!(world.world_position(dep_node), Some(expected));
    }

    #[test]
    fn locked_axis_propagation() {
        let (mut world, mut theater, _) = setup();
        theater
            .rig_mut()
            .unwrap()
            .set_axis_locks(AxisLocks::new(true, false, false));
        let root_node = world.spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();
        let a_node = world.spawn(Transform::from_xyz(5.0, 0.0, 0.0)).id();
        let b_node = world.spawn(Transform::from_xyz(-2.0, 1.0, 3.0)).id();
        let root = theater.add_entity(root_node);
        let a = theater.add_entity(a_node);
        let b = theater.add_entity(b_node);
        theater.set_root(root).unwrap();
        for id in [root, a, b] {
            theater.activate(id, &mut world).unwrap();
        }

        theater
            .move_controller(root, Vec3::new(3.0, 0.0, 0.0), &mut world)
            .unwrap();

        assert_eq!(theater.relative_offset(root), Some(Vec3::ZERO));
        assert_eq!(theater.relative_offset(a), Some(Vec3::new(2.0, 0.0, 0.0)));
        assert_eq!(theater.relative_offset(b), Some(Vec3::new(-5.0, 1.0, 3.0)));
    }

    #[test]
    fn unlocked_axes_stay_on_root() {
        let (mut world, mut theater, _) = setup();
        theater
            .rig_mut()
            .unwrap()
            .set_axis_locks(AxisLocks::new(true, false, false));
        let root_node = world.spawn(Transform::default()).id();
        let dep_node = world.spawn(Transform::from_xyz(4.0, 0.0, 0.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();
        theater.activate(dep, &mut world).unwrap();

        theater
            .move_controller(root, Vec3::new(1.0, 2.0, 0.0), &mut world)
            .unwrap();

        assert_eq!(theater.relative_offset(root), Some(Vec3::new(0.0, 2.0, 0.0)));
        assert_eq!(theater.relative_offset(dep), Some(Vec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn locked_axes_read_zero_after_every_tick() {
        let (mut world, mut theater, _) = setup();
        theater.rig_mut().unwrap().set_axis_locks(AxisLocks::ALL);
        let root_node = world.spawn(Transform::default()).id();
        let root = theater.add_entity(root_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();

        for _ in 0..3 {
            theater.fixed_update(&mut world);
            assert_eq!(theater.relative_offset(root), Some(Vec3::ZERO));
        }
    }

    #[test]
    fn no_update_below_epsilon() {
        let (world, mut theater, _) = setup();
        let mut scene = CountingScene { world, writes: 0 };
        let root_node = scene.world.spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();
        let dep_node = scene.world.spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut scene).unwrap();
        theater.activate(dep, &mut scene).unwrap();
        assert_eq!(scene.writes, 0);

        theater
            .set_relative_offset(dep, Vec3::new(1e-5, 0.0, 0.0), &mut scene)
            .unwrap();
        theater.fixed_update(&mut scene);
        assert_eq!(scene.writes, 0);

        theater
            .set_relative_offset(dep, Vec3::new(1.0, 0.0, 0.0), &mut scene)
            .unwrap();
        assert_eq!(scene.writes, 1);
    }

    #[test]
    fn unchanged_offset_does_not_recompute() {
        let (world, mut theater, _) = setup();
        let mut scene = CountingScene { world, writes: 0 };
        let root_node = scene.world.spawn(Transform::default()).id();
        let dep_node = scene.world.spawn(Transform::from_xyz(2.0, 0.0, 0.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut scene).unwrap();
        theater.activate(dep, &mut scene).unwrap();
        let writes = scene.writes;

        theater
            .set_relative_offset(dep, Vec3::new(2.0, 0.0, 0.0), &mut scene)
            .unwrap();
        theater.move_controller(dep, Vec3::ZERO, &mut scene).unwrap();
        assert_eq!(scene.writes, writes);
    }

    #[test]
    fn fixed_update_follows_camera() {
        let (mut world, mut theater, camera) = setup();
        let root_node = world.spawn(Transform::default()).id();
        let dep_node = world.spawn(Transform::from_xyz(5.0, 0.0, 0.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();
        theater.activate(dep, &mut world).unwrap();

        world.set_world_position(camera, Vec3::new(2.0, 0.0, -10.0));
        theater.fixed_update(&mut world);

        let expected = project(Vec3::new(5.0, 0.0, 0.0), &view(&world, camera));
        let actual = world.world_position(dep_node).unwrap();
        assert!(actual.abs_diff_eq(expected, 1e-5));
        assert!((actual.x - 4.25).abs() < 1e-4, "x = {}", actual.x);
    }

    #[test]
    fn missing_camera_is_a_noop() {
        let (mut world, mut theater, camera) = setup();
        world.entity_mut(camera).remove::<OrthographicCamera>();
        let root_node = world.spawn(Transform::default()).id();
        let dep_node = world.spawn(Transform::from_xyz(5.0, 0.0, 0.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();
        theater.activate(dep, &mut world).unwrap();
        theater.fixed_update(&mut world);

        assert!(!theater.start(&world));
        assert_eq!(world.world_position(dep_node), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn disabled_root_suspends_correction() {
        let (mut world, mut theater, _) = setup();
        let root_node = world.spawn(Transform::default()).id();
        let dep_node = world.spawn(Transform::from_xyz(5.0, 0.0, 0.0)).id();
        let root = theater.add_entity(root_node);
        let dep = theater.add_entity(dep_node);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();
        theater.activate(dep, &mut world).unwrap();
        let corrected = world.world_position(dep_node).unwrap();

        theater.deactivate(root).unwrap();
        theater
            .move_controller(dep, Vec3::new(1.0, 0.0, 0.0), &mut world)
            .unwrap();
        theater.fixed_update(&mut world);

        assert_eq!(world.world_position(dep_node), Some(corrected));
        assert_eq!(theater.relative_offset(dep), Some(Vec3::new(6.0, 0.0, 0.0)));
        assert_eq!(theater.enabled_controllers().collect::<Vec<_>>(), vec![dep]);
    }

    #[test]
    fn no_rig_self_anchors() {
        let mut world = World::new();
        let mut theater = Theater::without_rig();
        let node = world.spawn(Transform::from_xyz(3.0, 4.0, 5.0)).id();
        let id = theater.add_entity(node);
        theater.activate(id, &mut world).unwrap();

        assert_eq!(theater.relative_offset(id), Some(Vec3::new(3.0, 4.0, 5.0)));
        assert_eq!(world.world_position(node), Some(Vec3::new(3.0, 4.0, 5.0)));
        assert!(!theater.start(&world));
    }

    #[test]
    fn root_assignment_is_validated() {
        let (mut world, mut theater, _) = setup();
        let node = world.spawn(Transform::default()).id();
        let tile = world.spawn(Transform::default()).id();
        let backdrop = theater.add_backdrop(node, &[tile], Vec3::splat(10.0), &world);

        assert!(matches!(
            theater.set_root(ControllerId(42)),
            Err(TheaterError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            theater.set_root(backdrop),
            Err(TheaterError::InvalidConfiguration(_))
        ));
        assert_eq!(theater.root(), None);

        let mut rigless = Theater::without_rig();
        let id = rigless.add_entity(node);
        assert!(rigless.set_root(id).is_err());
    }

    #[test]
    fn unknown_controllers_are_rejected() {
        let (mut world, mut theater, _) = setup();
        let ghost = ControllerId(7);
        assert_eq!(
            theater.activate(ghost, &mut world),
            Err(TheaterError::UnknownController(ghost))
        );
        assert_eq!(
            theater.move_controller(ghost, Vec3::ONE, &mut world),
            Err(TheaterError::UnknownController(ghost))
        );
        assert!(theater.deactivate(ghost).is_err());
    }

    #[test]
    fn activation_requires_node() {
        let (mut world, mut theater, _) = setup();
        let node = world.spawn(Transform::default()).id();
        world.despawn(node);
        let id = theater.add_entity(node);

        assert_eq!(
            theater.activate(id, &mut world),
            Err(TheaterError::MissingNode(node))
        );
        assert_eq!(theater.controller(id).unwrap().phase(), Phase::Inactive);
    }

    #[test]
    fn backdrop_follows_locked_root() {
        let (mut world, mut theater, camera) = setup();
        theater
            .rig_mut()
            .unwrap()
            .set_axis_locks(AxisLocks::new(true, false, false));
        let root_node = world.spawn(Transform::default()).id();
        let backdrop_node = world.spawn(Transform::from_xyz(0.0, 0.0, 20.0)).id();
        let tiles: Vec<Entity> = [-5.0f32, 0.0, 5.0]
            .iter()
            .map(|&x| world.spawn(Transform::from_xyz(x, 0.0, 20.0)).id())
            .collect();

        let root = theater.add_entity(root_node);
        let backdrop =
            theater.add_backdrop(backdrop_node, &tiles, Vec3::new(15.0, 1.0, 1.0), &world);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();
        theater.activate(backdrop, &mut world).unwrap();

        let before: Vec<Vec3> = tiles
            .iter()
            .map(|&t| world.world_position(t).unwrap())
            .collect();
        theater
            .move_controller(root, Vec3::new(1.0, 0.0, 0.0), &mut world)
            .unwrap();

        assert_eq!(
            theater.relative_offset(backdrop),
            Some(Vec3::new(-1.0, 0.0, 20.0))
        );
        // Every tile shifted by the same amount
        let view = view(&world, camera);
        let shift = project(Vec3::new(-1.0, 0.0, 20.0), &view).x
            - project(Vec3::new(0.0, 0.0, 20.0), &view).x;
        for (t, b) in tiles.iter().zip(&before) {
            let after = world.world_position(*t).unwrap();
            let dx = after.x - b.x;
            assert!(
                (dx - shift).abs() < 1e-4 || (dx - shift - 15.0).abs() < 1e-4,
                "dx = {dx}, shift = {shift}"
            );
        }
        // The backdrop's own node is never moved
        assert_eq!(world.world_position(backdrop_node), Some(Vec3::new(0.0, 0.0, 20.0)));
    }

    #[test]
    fn reactivated_backdrop_keeps_tiles_in_place() {
        let (mut world, mut theater, _) = setup();
        let root_node = world.spawn(Transform::default()).id();
        let backdrop_node = world.spawn(Transform::from_xyz(5.0, 0.0, 20.0)).id();
        let tile = world.spawn(Transform::from_xyz(5.0, 0.0, 20.0)).id();

        let root = theater.add_entity(root_node);
        let backdrop = theater.add_backdrop(backdrop_node, &[tile], Vec3::splat(10.0), &world);
        theater.set_root(root).unwrap();
        theater.activate(root, &mut world).unwrap();
        theater.activate(backdrop, &mut world).unwrap();
        theater.fixed_update(&mut world);

        let placed = world.world_position(tile).unwrap();
        assert!((placed.x - 1.25).abs() < 1e-4, "x = {}", placed.x);

        theater.deactivate(backdrop).unwrap();
        theater.activate(backdrop, &mut world).unwrap();
        let reactivated = world.world_position(tile).unwrap();
        assert!(reactivated.abs_diff_eq(placed, 1e-5), "{reactivated} != {placed}");

        theater.fixed_update(&mut world);
        let ticked = world.world_position(tile).unwrap();
        assert!(ticked.abs_diff_eq(placed, 1e-5), "{ticked} != {placed}");
        assert_eq!(
            theater.backdrop_mut(backdrop).unwrap().original_sub_positions(&world),
            &[Some(Vec3::new(5.0, 0.0, 20.0))]
        );
    }

    #[test]
    fn backdrop_size_setter_clamps() {
        let (mut world, mut theater, _) = setup();
        let node = world.spawn(Transform::default()).id();
        let tiles = [
            world.spawn(Transform::from_xyz(-3.0, 0.0, 0.0)).id(),
            world.spawn(Transform::from_xyz(3.0, 0.0, 0.0)).id(),
        ];
        let backdrop = theater.add_backdrop(node, &tiles, Vec3::ONE, &world);
        assert_eq!(theater.backdrop(backdrop).unwrap().size(), Vec3::new(6.0, 1.0, 1.0));

        theater
            .set_backdrop_size(backdrop, Vec3::new(2.0, 8.0, 0.5), &world)
            .unwrap();
        assert_eq!(theater.backdrop(backdrop).unwrap().size(), Vec3::new(6.0, 8.0, 0.5));

        let plain = theater.add_entity(node);
        assert!(theater.set_backdrop_size(plain, Vec3::ONE, &world).is_err());
    }
}
