//! Headless side-scroller showcasing the puppet theater
//!
//! Run with:
//!   cargo run --example scroll
//!   cargo run --example scroll -- --steps 120 --speed 0.5 --lock-x
//!
//! A root "player" walks to the right. With `--lock-x` the rig absorbs the
//! walk and the world scrolls past instead; the backdrop hills wrap around
//! their box forever.

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec3;
use puppet_theater::systems::{fixed_update_schedule, theater_activate, theater_start};
use puppet_theater::{
    AxisLocks, CameraRig, OrthographicCamera, Theater, TheaterConfig, TheaterResult, Transform,
};

/// Puppet theater scrolling demo.
#[derive(Parser, Debug)]
#[command(name = "scroll", about = "Headless puppet theater scrolling demo", version)]
struct Args {
    /// Number of fixed ticks to simulate.
    #[arg(long, default_value = "60")]
    steps: u32,

    /// Distance the root walks per tick.
    #[arg(long, default_value = "0.25")]
    speed: f32,

    /// Simulated field of view in degrees.
    #[arg(long, default_value = "60")]
    fov: f32,

    /// Absorb horizontal root movement in the rig.
    #[arg(long)]
    lock_x: bool,

    /// Log positions every N ticks.
    #[arg(long, default_value = "10")]
    report_every: u32,
}

fn main() -> TheaterResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = TheaterConfig::new()
        .with_field_of_view(args.fov)
        .with_axis_locks(AxisLocks::new(args.lock_x, false, false));

    let mut world = World::new();
    let camera = world
        .spawn((Transform::from_xyz(0.0, 2.0, -10.0), OrthographicCamera::new(5.0)))
        .id();
    let player = world.spawn(Transform::from_xyz(0.0, 0.0, 0.0)).id();
    let tree = world.spawn(Transform::from_xyz(4.0, 1.0, 5.0)).id();
    let hills_node = world.spawn(Transform::from_xyz(0.0, 3.0, 40.0)).id();
    let hills: Vec<Entity> = (0..5)
        .map(|i| {
            let x = -10.0 + 5.0 * i as f32;
            world.spawn(Transform::from_xyz(x, 3.0, 40.0)).id()
        })
        .collect();

    let mut theater = Theater::with_config(CameraRig::from_config(camera, &config), &config);
    let root = theater.add_entity(player);
    let tree_id = theater.add_entity(tree);
    let hills_id = theater.add_backdrop(hills_node, &hills, Vec3::new(25.0, 1.0, 1.0), &world);
    theater.set_root(root)?;
    world.insert_resource(theater);

    if !theater_start(&world) {
        log::warn!("Theater is misconfigured, positions will not be corrected");
    }
    for id in [root, tree_id, hills_id] {
        theater_activate(&mut world, id)?;
    }

    let mut schedule = fixed_update_schedule();
    let step = Vec3::new(args.speed, 0.0, 0.0);
    for tick in 0..args.steps {
        world.resource_scope(|world, mut theater: Mut<Theater>| {
            theater.move_controller(root, step, world)
        })?;
        schedule.run(&mut world);

        if args.report_every > 0 && tick % args.report_every == 0 {
            let position = |e: Entity| world.get::<Transform>(e).map(|t| t.position);
            log::info!(
                "tick {tick:4}: player {:?} tree {:?} first hill {:?}",
                position(player),
                position(tree),
                position(hills[0]),
            );
        }
    }

    let theater = world.resource::<Theater>();
    log::info!(
        "Done: player offset {:?}, tree offset {:?}",
        theater.relative_offset(root),
        theater.relative_offset(tree_id)
    );
    Ok(())
}
