use glam::Vec2;
use hecs::World;

use crate::systems::particles::tackle_puff;
use crate::{Body, BodyId, Cooldowns, Events, GameRng, Params, Side, StepContext};

/// Position and velocity of the ball, if one exists
pub fn ball_state(world: &World) -> Option<(Vec2, Vec2, f32)> {
    world
        .query::<&Body>()
        .iter()
        .find(|(_, body)| body.is_ball())
        .map(|(_, ball)| (ball.pos, ball.vel, ball.radius()))
}

/// Nudge the ball along a moving dribbler's heading
pub fn dribble_assist(world: &mut World, ctx: &StepContext) {
    let Some((ball_pos, _, ball_radius)) = ball_state(world) else {
        return;
    };

    let mut nudge = Vec2::ZERO;
    for (_entity, (body, cooldowns)) in world.query_mut::<(&Body, &mut Cooldowns)>() {
        let Some(side) = body.side() else { continue };
        if !body.is_outfield() {
            continue;
        }
        if cooldowns.dribble > 0.0 {
            cooldowns.dribble -= ctx.time.dt;
            continue;
        }

        let reach = body.radius() + ball_radius + Params::DRIBBLE_REACH;
        if body.pos.distance_squared(ball_pos) >= reach * reach {
            continue;
        }
        let speed = body.speed();
        if speed > Params::DRIBBLE_MIN_SPEED {
            nudge += body.vel / speed * Params::DRIBBLE_BOOST * ctx.mods(side).dribble_control;
            cooldowns.dribble = Params::DRIBBLE_COOLDOWN;
        }
    }

    if nudge != Vec2::ZERO {
        for (_entity, body) in world.query_mut::<&mut Body>() {
            if body.is_ball() {
                body.vel += nudge;
            }
        }
    }
}

/// Tackle range for an outfielder of `side`
pub fn tackle_range(ctx: &StepContext, side: Side) -> f32 {
    let mut range = ctx.config.tackle_distance * ctx.pitch.scale * ctx.mods(side).tackle_range;
    if ctx.in_comeback(side) {
        range *= Params::COMEBACK_TACKLE_RANGE;
    }
    range
}

/// Per-frame lunge chance for an outfielder of `side`
pub fn tackle_chance(ctx: &StepContext, side: Side) -> f32 {
    let mut chance = Params::TACKLE_BASE_CHANCE * ctx.mods(side).tackle_chance;
    if ctx.in_comeback(side) {
        chance *= Params::COMEBACK_TACKLE_CHANCE;
    }
    chance * ctx.time.dt
}

/// Outfielders near the ball occasionally lunge at it
pub fn attempt_tackles(world: &mut World, ctx: &StepContext, events: &mut Events, rng: &mut GameRng) {
    let Some((ball_pos, _, _)) = ball_state(world) else {
        return;
    };

    for (_entity, (body, cooldowns)) in world.query_mut::<(&mut Body, &mut Cooldowns)>() {
        let Some(side) = body.side() else { continue };
        if !body.is_outfield() || body.flags.frozen {
            continue;
        }
        if cooldowns.tackle > 0.0 {
            cooldowns.tackle -= ctx.time.dt;
            continue;
        }

        let range = tackle_range(ctx, side);
        let to_ball = ball_pos - body.pos;
        if to_ball.length_squared() >= range * range {
            continue;
        }
        if rng.chance(tackle_chance(ctx, side)) {
            let force = Params::TACKLE_FORCE * ctx.mods(side).tackle_force;
            body.vel += to_ball.normalize_or_zero() * force;
            tackle_puff(events, rng, body.pos, body.vel, ctx.team(side).primary());
            cooldowns.tackle = Params::TACKLE_COOLDOWN;
        }
    }
}

/// Keeper intelligence after the comeback penalty
pub fn goalie_intelligence(ctx: &StepContext, side: Side) -> f32 {
    let base = ctx.config.goalie_intelligence;
    if ctx.in_comeback(side) {
        base * Params::COMEBACK_GOALIE_INTELLIGENCE
    } else {
        base
    }
}

/// How far ahead a keeper reads the ball
pub fn prediction_frames(intelligence: f32, reaction: f32) -> f32 {
    Params::GOALIE_PREDICTION_FRAMES / (intelligence * reaction).max(0.01)
}

/// Goalkeepers steer toward where the ball will be
pub fn steer_goalies(world: &mut World, ctx: &StepContext) {
    let Some((ball_pos, ball_vel, _)) = ball_state(world) else {
        return;
    };
    let max_goalie_speed = ctx.config.max_player_speed * ctx.config.goalie_speed;

    for (_entity, body) in world.query_mut::<&mut Body>() {
        let BodyId::Goalie(side) = body.id else { continue };
        if body.flags.frozen {
            continue;
        }
        let reaction = if body.flags.blinded {
            Params::BLINDED_REACTION
        } else {
            ctx.mods(side).goalie_reaction
        };
        let frames = prediction_frames(goalie_intelligence(ctx, side), reaction);
        let target = ball_pos + ball_vel * frames;
        let delta = target - body.pos;
        let dist = delta.length();
        if dist > 1.0 {
            let sign = if body.flags.confused { -1.0 } else { 1.0 };
            body.vel += delta / dist * max_goalie_speed * Params::GOALIE_STEER * sign;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KickDecision {
    Shoot,
    Pass(BodyId),
    Dribble,
}

/// Kick chosen by the auto-shoot logic. `direction` is a unit vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kick {
    pub decision: KickDecision,
    pub direction: Vec2,
    pub force: f32,
}

/// Score a pass from `kicker` to `target`; higher is better
fn pass_score(kicker: &Body, target: &Body, goal: Vec2, bodies: &[Body], player_r: f32) -> f32 {
    let kicker_dist = kicker.pos.distance(goal);
    let target_dist = target.pos.distance(goal);
    if target_dist >= kicker_dist - player_r {
        return -1.0;
    }
    let mut score = (kicker_dist - target_dist) * 0.5;

    let opponents = || bodies.iter().filter(|b| b.side().is_some() && b.side() != kicker.side());
    let closest = opponents()
        .map(|o| o.pos.distance(target.pos))
        .fold(f32::INFINITY, f32::min);
    if closest < player_r * 4.0 {
        score -= player_r * 5.0 - closest;
    } else {
        score += Params::PASS_OPEN_BONUS;
    }

    let line = target.pos - kicker.pos;
    let len_sq = line.length_squared();
    if len_sq > f32::EPSILON {
        let interceptors = opponents()
            .filter(|o| {
                let t = (o.pos - kicker.pos).dot(line) / len_sq;
                t > 0.0 && t < 1.0 && o.pos.distance(kicker.pos + line * t) < player_r * 2.0
            })
            .count();
        score -= interceptors as f32 * Params::PASS_INTERCEPT_PENALTY;
    }
    score
}

/// Decide what an outfielder does with the ball on contact
pub fn decide_kick(kicker: &Body, ball: &Body, bodies: &[Body], ctx: &StepContext, rng: &mut GameRng) -> Option<Kick> {
    let side = kicker.side()?;
    let mods = ctx.mods(side);
    let pitch = ctx.pitch;
    let goal = pitch.target_goal_center(side);
    let player_r = ctx.config.player_size * pitch.scale;

    let best_pass = bodies
        .iter()
        .filter(|b| b.side() == Some(side) && b.is_outfield() && b.id != kicker.id)
        .map(|t| (t, pass_score(kicker, t, goal, bodies, player_r) * mods.midfield))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|(_, score)| *score > Params::PASS_THRESHOLD)
        .map(|(t, _)| t);

    let kicker_dist = kicker.pos.distance(goal);
    let in_range = kicker_dist < pitch.length() * Params::SHOT_RANGE;
    let shoot = in_range && best_pass.map_or(true, |t| kicker_dist < t.pos.distance(goal));

    let kick = if shoot {
        let spread = Params::SHOT_SPREAD / mods.kick_power.max(0.1);
        let post_offset = rng.jitter(pitch.goal_height * Params::SHOT_AIM_SPAN);
        let target = goal + pitch.lateral_dir() * post_offset + Vec2::new(rng.jitter(spread), rng.jitter(spread));
        let mut force = Params::SHOT_FORCE * mods.kick_power;
        if ctx.in_comeback(side) {
            force *= Params::COMEBACK_SHOT;
        }
        Kick {
            decision: KickDecision::Shoot,
            direction: (target - ball.pos).normalize_or_zero(),
            force,
        }
    } else if let Some(target) = best_pass {
        Kick {
            decision: KickDecision::Pass(target.id),
            direction: (target.pos - ball.pos).normalize_or_zero(),
            force: Params::PASS_FORCE * mods.midfield,
        }
    } else {
        let wobble = Params::DRIBBLE_KICK_JITTER / mods.midfield.max(0.1);
        let heading = pitch.attack_dir(side) + Vec2::new(rng.jitter(wobble), rng.jitter(wobble));
        Kick {
            decision: KickDecision::Dribble,
            direction: heading.normalize_or_zero(),
            force: Params::DRIBBLE_KICK_FORCE,
        }
    };
    Some(kick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuffCatalog, Config, Pitch, Score, TeamInfo, TeamModifiers, Time};

    struct Fixture {
        config: Config,
        pitch: Pitch,
        catalog: BuffCatalog,
        teams: [TeamInfo; 2],
        modifiers: [TeamModifiers; 2],
    }

    fn setup_fixture() -> Fixture {
        let config = Config::new();
        Fixture {
            pitch: Pitch::new(&config),
            config,
            catalog: BuffCatalog::new(),
            teams: [
                TeamInfo::new("a", "A", "#ff0000", "#ffffff"),
                TeamInfo::new("b", "B", "#0000ff", "#ffffff"),
            ],
            modifiers: [TeamModifiers::default(); 2],
        }
    }

    fn ctx<'a>(f: &'a Fixture, score: &Score) -> StepContext<'a> {
        StepContext {
            config: &f.config,
            pitch: &f.pitch,
            catalog: &f.catalog,
            teams: &f.teams,
            modifiers: &f.modifiers,
            comeback: crate::comeback_side(score),
            time: Time::default(),
        }
    }

    fn player(side: Side, slot: u8, pos: Vec2) -> Body {
        Body::outfield(side, slot, pos, Vec2::ZERO, 25.0)
    }

    fn ball(pos: Vec2) -> Body {
        Body::ball(pos, Vec2::ZERO, 15.0, crate::BallKind::Classic.profile())
    }

    #[test]
    fn test_shoots_when_close_and_no_better_pass() {
        let f = setup_fixture();
        let ctx = ctx(&f, &Score::new());
        let mut rng = GameRng::new(1);
        let kicker = player(Side::A, 0, Vec2::new(800.0, 300.0));
        let bodies = vec![kicker, ball(Vec2::new(820.0, 300.0))];

        let kick = decide_kick(&kicker, &bodies[1], &bodies, &ctx, &mut rng).expect("outfielder kicks");
        assert_eq!(kick.decision, KickDecision::Shoot);
        assert!(kick.direction.x > 0.5, "Shot heads for side B's goal");
        assert_eq!(kick.force, Params::SHOT_FORCE);
    }

    #[test]
    fn test_passes_to_open_teammate_upfield() {
        let f = setup_fixture();
        let ctx = ctx(&f, &Score::new());
        let mut rng = GameRng::new(1);
        let kicker = player(Side::A, 0, Vec2::new(200.0, 300.0));
        let mate = player(Side::A, 1, Vec2::new(450.0, 300.0));
        let far_opponent = player(Side::B, 0, Vec2::new(300.0, 550.0));
        let bodies = vec![kicker, mate, far_opponent, ball(Vec2::new(215.0, 300.0))];

        let kick = decide_kick(&kicker, &bodies[3], &bodies, &ctx, &mut rng).expect("outfielder kicks");
        assert_eq!(kick.decision, KickDecision::Pass(mate.id));
        assert_eq!(kick.force, Params::PASS_FORCE);
    }

    #[test]
    fn test_blocked_pass_falls_back_to_dribble() {
        let f = setup_fixture();
        let ctx = ctx(&f, &Score::new());
        let mut rng = GameRng::new(1);
        let kicker = player(Side::A, 0, Vec2::new(200.0, 300.0));
        let mate = player(Side::A, 1, Vec2::new(450.0, 300.0));
        let blocker = player(Side::B, 0, Vec2::new(440.0, 310.0));
        let bodies = vec![kicker, mate, blocker, ball(Vec2::new(215.0, 300.0))];

        let kick = decide_kick(&kicker, &bodies[3], &bodies, &ctx, &mut rng).expect("outfielder kicks");
        assert_eq!(kick.decision, KickDecision::Dribble);
        assert!(kick.direction.x > 0.9);
    }

    #[test]
    fn test_comeback_boosts_shot_and_weakens_keeper() {
        let f = setup_fixture();
        let mut score = Score::new();
        score.increment(Side::B);
        score.increment(Side::B);
        let ctx = ctx(&f, &score);
        let mut rng = GameRng::new(1);
        let kicker = player(Side::A, 0, Vec2::new(800.0, 300.0));
        let bodies = vec![kicker, ball(Vec2::new(820.0, 300.0))];

        let kick = decide_kick(&kicker, &bodies[1], &bodies, &ctx, &mut rng).expect("outfielder kicks");
        assert!((kick.force - Params::SHOT_FORCE * Params::COMEBACK_SHOT).abs() < 1e-4);
        assert!(goalie_intelligence(&ctx, Side::A) < goalie_intelligence(&ctx, Side::B));
        assert!(tackle_range(&ctx, Side::A) > tackle_range(&ctx, Side::B));
    }

    #[test]
    fn test_blinded_keeper_reads_further_ahead() {
        let sharp = prediction_frames(1.0, 1.0);
        let blind = prediction_frames(1.0, Params::BLINDED_REACTION);
        assert_eq!(sharp, 20.0);
        assert!(blind > sharp);
        assert!(prediction_frames(0.0, 0.0).is_finite());
    }

    #[test]
    fn test_dribble_assist_respects_cooldown() {
        let f = setup_fixture();
        let ctx = ctx(&f, &Score::new());
        let mut world = World::new();
        world.spawn((
            Body::outfield(Side::A, 0, Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), 25.0),
            Cooldowns::default(),
        ));
        let ball = world.spawn((ball(Vec2::new(140.0, 100.0)), Cooldowns::default()));

        dribble_assist(&mut world, &ctx);
        let after_first = world.get::<&Body>(ball).map(|b| b.vel).expect("ball");
        assert!((after_first.x - Params::DRIBBLE_BOOST).abs() < 1e-5);

        dribble_assist(&mut world, &ctx);
        let after_second = world.get::<&Body>(ball).map(|b| b.vel).expect("ball");
        assert_eq!(after_first, after_second, "No second nudge during cooldown");
    }
}
