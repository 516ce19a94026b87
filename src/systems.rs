//! `bevy_ecs` integration
//!
//! The [`Theater`] lives in the world as a resource and reads/writes node
//! transforms through the same world, so every entry point here is an
//! exclusive system or takes `&mut World`.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{ExecutorKind, ScheduleLabel};

use crate::controller::ControllerId;
use crate::error::{TheaterError, TheaterResult};
use crate::Theater;

/// Schedule run once per fixed simulation step
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct TheaterFixedUpdate;

/// Schedule containing [`theater_fixed_update`]
pub fn fixed_update_schedule() -> Schedule {
    let mut schedule = Schedule::new(TheaterFixedUpdate);
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems(theater_fixed_update);
    schedule
}

/// Recompute every settled controller of the world's theater
pub fn theater_fixed_update(world: &mut World) {
    if !world.contains_resource::<Theater>() {
        return;
    }
    world.resource_scope(|world, mut theater: Mut<Theater>| theater.fixed_update(world));
}

/// Activate a controller of the world's theater
pub fn theater_activate(world: &mut World, id: ControllerId) -> TheaterResult<()> {
    if !world.contains_resource::<Theater>() {
        return Err(TheaterError::InvalidConfiguration(
            "no theater resource in the world".into(),
        ));
    }
    world.resource_scope(|world, mut theater: Mut<Theater>| theater.activate(id, world))
}

/// Validate the world's theater, logging configuration errors
pub fn theater_start(world: &World) -> bool {
    match world.get_resource::<Theater>() {
        Some(theater) => theater.start(world),
        None => {
            log::error!("No theater resource in the world");
            false
        }
    }
}
