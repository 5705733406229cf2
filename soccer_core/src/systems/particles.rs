use std::f32::consts::{PI, TAU};

use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::{Color, Events, GameRng, Params, Particle, Pitch, Side, TeamInfo};

/// Move this frame's queued particles into the world, up to the live cap
pub fn emit_particles(world: &mut World, events: &mut Events) {
    if events.particles.is_empty() {
        return;
    }
    let live = world.query::<&Particle>().iter().count();
    let room = Params::MAX_PARTICLES.saturating_sub(live);
    if events.particles.len() > room {
        log::debug!("particle cap reached, dropping {}", events.particles.len() - room);
    }
    for particle in events.particles.drain(..).take(room) {
        world.spawn((particle,));
    }
}

/// Advance every particle and despawn the spent ones
pub fn advance_particles(world: &mut World, dt: f32) {
    let mut spent = Vec::new();
    for (entity, particle) in world.query_mut::<&mut Particle>() {
        particle.pos += particle.vel * dt;
        particle.vel.y += Params::PARTICLE_GRAVITY * dt;
        particle.life -= dt;
        if particle.life <= 0.0 {
            spent.push(entity);
        }
    }
    for entity in spent {
        let _ = world.despawn(entity);
    }
}

pub fn clear_particles(world: &mut World) {
    let all: Vec<_> = world.query::<&Particle>().iter().map(|(e, _)| e).collect();
    for entity in all {
        let _ = world.despawn(entity);
    }
}

/// Sparks thrown back off the ball where a player struck it
pub fn sparks(events: &mut Events, rng: &mut GameRng, at: Vec2, normal: Vec2, impact: f32, color: Color) {
    let count = ((impact * 2.0) as usize).min(15);
    let back = normal.y.atan2(normal.x) + PI;
    for _ in 0..count {
        let angle = back + rng.jitter(PI);
        let speed = rng.0.gen::<f32>() * impact * 0.4;
        events.particles.push(Particle {
            pos: at,
            vel: Vec2::from_angle(angle) * speed,
            life: 20.0 + rng.0.gen::<f32>() * 20.0,
            max_life: 40.0,
            size: rng.0.gen::<f32>() * 2.0 + 1.0,
            color,
        });
    }
}

/// Dust kicked up by a tackle lunge
pub fn tackle_puff(events: &mut Events, rng: &mut GameRng, at: Vec2, vel: Vec2, color: Color) {
    for _ in 0..5 {
        events.particles.push(Particle {
            pos: at,
            vel: Vec2::new(rng.jitter(2.0), rng.jitter(2.0)) - vel * 0.1,
            life: 20.0 + rng.0.gen::<f32>() * 15.0,
            max_life: 35.0,
            size: rng.0.gen::<f32>() * 2.0 + 1.0,
            color,
        });
    }
}

/// Celebration burst fanning back out of the goal `scorer` just hit
pub fn fireworks(events: &mut Events, rng: &mut GameRng, pitch: &Pitch, scorer: Side, team: &TeamInfo) {
    let origin = pitch.target_goal_center(scorer);
    let inward = -pitch.attack_dir(scorer);
    let colors = [team.primary(), team.secondary()];
    for _ in 0..100 {
        let spread = Vec2::from_angle(rng.jitter(PI));
        let speed = rng.0.gen::<f32>() * 10.0 + 5.0;
        events.particles.push(Particle {
            pos: origin,
            vel: spread.rotate(inward) * speed,
            life: 60.0 + rng.0.gen::<f32>() * 60.0,
            max_life: 120.0,
            size: rng.0.gen::<f32>() * 5.0 + 2.0,
            color: colors[rng.0.gen_range(0..2)],
        });
    }
}

/// Fireball burst for an impact bomb
pub fn explosion(events: &mut Events, rng: &mut GameRng, at: Vec2) {
    for _ in 0..50 {
        let angle = rng.0.gen::<f32>() * TAU;
        let speed = rng.0.gen::<f32>() * 8.0 + 2.0;
        let green = rng.0.gen_range(100..=255u32);
        events.particles.push(Particle {
            pos: at,
            vel: Vec2::from_angle(angle) * speed,
            life: 40.0 + rng.0.gen::<f32>() * 30.0,
            max_life: 70.0,
            size: rng.0.gen::<f32>() * 4.0 + 2.0,
            color: Color(0xff0000 | green << 8),
        });
    }
}
