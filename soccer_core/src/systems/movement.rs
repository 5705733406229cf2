use glam::Vec2;
use hecs::World;

use crate::buffs::{BallEffect, Mechanic};
use crate::{Body, BuffState, GameRng, Params, Pitch, StepContext};

/// Max speed for `body` after role and modifiers
pub fn max_speed(body: &Body, ctx: &StepContext) -> f32 {
    let mut max = ctx.config.max_player_speed * body.speed_factor;
    if body.is_goalie() {
        max *= ctx.config.goalie_speed;
    }
    max
}

/// Friction, spin and in-flight shot behaviour for the ball
fn steer_ball(ball: &mut Body, ctx: &StepContext, effect: Option<&mut BallEffect>) {
    let pitch = ctx.pitch;
    ball.vel *= ball.friction;

    let spin = ctx.config.ball_profile().spin;
    if spin != 0.0 {
        ball.vel += pitch.lateral_dir() * spin * pitch.along(ball.vel);
    }

    let Some(effect) = effect else { return };
    match effect.mechanic {
        Mechanic::Homing => {
            let to_goal = pitch.target_goal_center(effect.owner) - ball.pos;
            let dist = to_goal.length();
            if dist > 1.0 {
                let desired = to_goal / dist * ctx.config.max_player_speed * 1.5;
                ball.vel = ball.vel * 0.9 + desired * 0.1;
            }
        }
        Mechanic::CurveShot => {
            let forward = ball.vel.dot(pitch.attack_dir(effect.owner));
            if forward > 0.5 {
                let offset = pitch.span() / 2.0 - pitch.across(ball.pos);
                if offset.abs() > 1.0 {
                    ball.vel += pitch.lateral_dir() * offset.signum() * 0.05 * forward;
                }
            }
        }
        Mechanic::TwoStage if !effect.boosted && effect.progress() >= 0.5 => {
            ball.vel *= 2.5;
            effect.boosted = true;
        }
        _ => {}
    }
}

/// Clamp to the speed limit, and keep outfielders from stalling
fn limit_speed(body: &mut Body, max: f32, min: f32) {
    let speed = body.speed();
    if speed > max && speed > 0.0 {
        body.vel *= max / speed;
    } else if body.is_outfield() && speed > 0.0 && speed < min {
        body.vel *= min / speed;
    }
}

/// Integrate every body that is not frozen
pub fn integrate(world: &mut World, ctx: &StepContext, buffs: &mut BuffState, rng: &mut GameRng) {
    let pitch: &Pitch = ctx.pitch;
    let fallback = pitch.center();
    let ceiling = ctx.config.max_player_speed * Params::BALL_EFFECT_SPEED_CEILING;

    for (_entity, body) in world.query_mut::<&mut Body>() {
        if body.flags.frozen {
            continue;
        }

        if let Some(side) = body.id.side().filter(|_| body.is_goalie()) {
            let radius = body.radius();
            pitch.confine_goalie(side, &mut body.pos, &mut body.vel, radius);
        }

        if body.flags.confused && body.is_outfield() {
            body.vel += Vec2::new(rng.jitter(Params::CONFUSION_JITTER), rng.jitter(Params::CONFUSION_JITTER));
        }

        let max = if body.is_ball() {
            steer_ball(body, ctx, buffs.ball_effect.as_mut());
            if buffs.ball_effect.is_some() {
                ceiling
            } else {
                ctx.config.max_player_speed
            }
        } else {
            max_speed(body, ctx)
        };
        limit_speed(body, max, ctx.config.min_player_speed);

        body.pos += body.vel * ctx.time.dt;
        body.sanitize(fallback);
    }
}
