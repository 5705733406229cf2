pub mod buffs;
pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod map;
pub mod params;
pub mod ratings;
pub mod resources;
pub mod simulation;
pub mod systems;
pub mod teams;

pub use buffs::*;
pub use clock::*;
pub use components::*;
pub use config::*;
pub use error::CoreError;
pub use map::*;
pub use params::*;
pub use ratings::*;
pub use resources::*;
pub use simulation::*;
pub use teams::*;

use std::f32::consts::TAU;

use glam::Vec2;
use hecs::World;
use rand::Rng;
use systems::*;

/// Outfield kickoff spots as (fraction of half length, fraction of span), 4-4-2
pub const FORMATION: [(f32, f32); 10] = [
    (0.25, 0.2),
    (0.25, 0.4),
    (0.25, 0.6),
    (0.25, 0.8),
    (0.4, 0.15),
    (0.4, 0.4),
    (0.4, 0.6),
    (0.4, 0.85),
    (0.55, 0.3),
    (0.55, 0.7),
];

/// Run one active frame of the soccer simulation.
///
/// Returns the side that scored this frame, if any. The caller owns what
/// happens next (score, celebration, kickoff).
pub fn step(
    world: &mut World,
    ctx: &StepContext,
    buffs: &mut BuffState,
    stats: &mut MatchStats,
    events: &mut Events,
    rng: &mut GameRng,
) -> Option<Side> {
    // 1. Expire field buffs and traps, count down effects
    gc(world, &ctx.time);
    buffs.tick(ctx.time.dt);
    spawn_buffs(world, ctx, buffs, events, rng);

    // 2. Rebuild modifiers from ratings, comeback and active buffs
    reset_body_modifiers(world, ctx);
    apply_active_buffs(world, buffs);
    apply_force_fields(world, ctx, buffs, events);

    // 3. AI
    dribble_assist(world, ctx);
    attempt_tackles(world, ctx, events, rng);
    steer_goalies(world, ctx);

    // 4. Integrate, then fields that act on the ball
    integrate(world, ctx, buffs, rng);
    apply_ball_fields(world, buffs, rng);

    // 5. Goals, walls and contacts
    let scored = resolve_collisions(world, ctx, buffs, stats, events, rng);

    // 6. Pickups and traps (skipped on a goal frame, the kickoff clears the field)
    if scored.is_none() {
        trigger_traps(world, buffs);
        collect_buffs(world, ctx, buffs, events, rng);
    }

    stats.tick_possession();
    emit_particles(world, events);
    scored
}

/// Uniform heading with a speed between the configured player speeds
pub fn random_velocity(config: &Config, rng: &mut GameRng) -> Vec2 {
    let angle = rng.0.gen::<f32>() * TAU;
    let speed = rng.0.gen_range(config.min_player_speed..=config.max_player_speed);
    Vec2::from_angle(angle) * speed
}

/// Helper to create an outfield player entity
pub fn create_outfield(world: &mut World, side: Side, slot: u8, pos: Vec2, vel: Vec2, radius: f32) -> hecs::Entity {
    world.spawn((Body::outfield(side, slot, pos, vel, radius), Cooldowns::default()))
}

/// Helper to create a goalkeeper entity
pub fn create_goalie(world: &mut World, side: Side, pos: Vec2, radius: f32) -> hecs::Entity {
    world.spawn((Body::goalie(side, pos, radius),))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: Vec2, vel: Vec2, radius: f32, profile: BallProfile) -> hecs::Entity {
    world.spawn((Body::ball(pos, vel, radius, profile),))
}

/// Replace every body with the kickoff formation.
///
/// The ball starts at the centre spot, moving when `ball_moving` is set.
pub fn spawn_kickoff(world: &mut World, pitch: &Pitch, config: &Config, rng: &mut GameRng, ball_moving: bool) {
    let bodies: Vec<hecs::Entity> = world.query::<&Body>().iter().map(|(e, _)| e).collect();
    for entity in bodies {
        let _ = world.despawn(entity);
    }

    let player_r = config.player_size * pitch.scale;
    let goalie_r = config.goalie_size * pitch.scale;
    let half = pitch.length() / 2.0;

    for side in Side::BOTH {
        let keeper = pitch.side_point(side, player_r * Params::GOALIE_SPAWN_DEPTH, pitch.span() / 2.0);
        create_goalie(world, side, keeper, goalie_r);

        for (slot, (depth, across)) in FORMATION.iter().enumerate() {
            let pos = pitch.side_point(side, depth * half, across * pitch.span());
            let vel = random_velocity(config, rng);
            create_outfield(world, side, slot as u8, pos, vel, player_r);
        }
    }

    let ball_vel = if ball_moving {
        random_velocity(config, rng)
    } else {
        Vec2::ZERO
    };
    create_ball(world, pitch.center(), ball_vel, config.ball_size * pitch.scale, config.ball_profile());
}
