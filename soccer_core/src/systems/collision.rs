use glam::Vec2;
use hecs::{Entity, World};

use crate::buffs::{BallEffect, Mechanic};
use crate::systems::ai::decide_kick;
use crate::systems::particles::{explosion, sparks};
use crate::systems::scoring::check_goal;
use crate::{Body, BuffState, Events, GameRng, MatchStats, Params, Sfx, Side, StatKind, StepContext};

const DRILL_PASS_CHANCE: f32 = 0.4;
const EXPLOSION_RADIUS: f32 = 150.0;
const EXPLOSION_FORCE: f32 = 40.0;

/// Contact between two overlapping bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal from the first body toward the second
    pub normal: Vec2,
    /// Closing speed along the normal before the impulse (0 when separating)
    pub approach: f32,
}

/// Separate two overlapping circles and exchange an elastic impulse.
///
/// Separation is split by inverse mass. The impulse is only applied while the
/// bodies are closing, so momentum along the normal is conserved.
pub fn collide_pair(a: &mut Body, b: &mut Body) -> Option<Contact> {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    let reach = a.radius() + b.radius();
    if dist >= reach {
        return None;
    }
    let normal = if dist > 1e-6 { delta / dist } else { Vec2::X };

    let inv_a = 1.0 / a.mass;
    let inv_b = 1.0 / b.mass;
    let overlap = reach - dist;
    a.pos -= normal * overlap * inv_a / (inv_a + inv_b);
    b.pos += normal * overlap * inv_b / (inv_a + inv_b);

    let approach = (a.vel - b.vel).dot(normal);
    if approach <= 0.0 {
        return Some(Contact { normal, approach: 0.0 });
    }
    let p = 2.0 * approach / (a.mass + b.mass);
    a.vel -= normal * p * b.mass;
    b.vel += normal * p * a.mass;
    Some(Contact { normal, approach })
}

/// Release a charged shot held by `shooter` into the ball.
///
/// Returns whether a shot was fired.
pub fn fire_charged_shot(ball: &mut Body, shooter: &Body, ctx: &StepContext, buffs: &mut BuffState) -> bool {
    let Some(side) = shooter.side() else {
        return false;
    };
    let Some(charge) = buffs.find_for_body(shooter.id, Mechanic::is_charged_shot).cloned() else {
        return false;
    };
    buffs.remove(charge.id);

    if let Some(factor) = charge.mechanic.shot_speed_factor() {
        let dir = if ball.speed() > 0.1 {
            ball.vel.normalize()
        } else {
            ctx.pitch.attack_dir(side)
        };
        ball.vel = dir * ctx.config.max_player_speed * factor * ctx.mods(side).kick_power;
    }
    if let Some(factor) = charge.mechanic.ball_mass_factor() {
        ball.mass = ball.base_mass * factor;
    }
    log::info!("{:?} fired {}", shooter.id, charge.key);
    buffs.ball_effect = Some(BallEffect::new(charge.key, charge.mechanic, side));
    true
}

/// Blast particles and knock every player away from `at`
pub fn explode(world: &mut World, events: &mut Events, rng: &mut GameRng, at: Vec2) {
    explosion(events, rng, at);
    for (_entity, body) in world.query_mut::<&mut Body>() {
        if body.is_ball() {
            continue;
        }
        let delta = body.pos - at;
        let dist = delta.length();
        if dist < EXPLOSION_RADIUS && dist > 0.01 {
            body.vel += delta / dist * EXPLOSION_FORCE / (dist + 10.0);
        }
    }
    log::debug!("impact bomb detonated at {at}");
}

fn bounce_off_walls(body: &mut Body, ctx: &StepContext) -> bool {
    let bounds = ctx.pitch.bounds();
    let radius = body.radius();
    let mut hit = false;
    for axis in 0..2 {
        let (lo, hi) = (bounds.min[axis] + radius, bounds.max[axis] - radius);
        if body.pos[axis] < lo {
            body.pos[axis] = lo;
        } else if body.pos[axis] > hi {
            body.pos[axis] = hi;
        } else {
            continue;
        }
        body.vel[axis] *= -body.bounciness;
        hit = true;
    }
    hit
}

/// Opposing bodies pass through a ghosted player; the drill shot sometimes
/// passes through keepers
fn passes_through(a: &Body, b: &Body, buffs: &BuffState, rng: &mut GameRng) -> bool {
    let players = !a.is_ball() && !b.is_ball();
    if players && (a.flags.ghost || b.flags.ghost) && a.side() != b.side() {
        return true;
    }
    let keeper_and_ball = (a.is_ball() && b.is_goalie()) || (a.is_goalie() && b.is_ball());
    keeper_and_ball
        && buffs.ball_effect.as_ref().is_some_and(|e| e.mechanic == Mechanic::Drill)
        && rng.chance(DRILL_PASS_CHANCE)
}

/// Per-frame state shared by every contact
struct Touches<'a, 'w> {
    ctx: &'a StepContext<'w>,
    buffs: &'a mut BuffState,
    stats: &'a mut MatchStats,
    events: &'a mut Events,
    rng: &'a mut GameRng,
    explosions: Vec<Vec2>,
    /// Bodies at the start of the frame, for kick decisions
    snapshot: Vec<Body>,
}

impl Touches<'_, '_> {
    fn record_touch(&mut self, player: &Body) {
        let Some(side) = player.side() else { return };
        let previous = self.stats.last_touch.replace(side);
        self.stats.get_mut(side).touches += 1;
        self.events.stat(side, StatKind::Touch);

        if player.is_goalie() && previous == Some(side.opponent()) {
            self.stats.get_mut(side).saves += 1;
            self.events.stat(side, StatKind::Save);
            self.stats.get_mut(side.opponent()).shots_on_target += 1;
            self.events.stat(side.opponent(), StatKind::ShotOnTarget);
        }
    }

    /// `impact` is how much the contact changed the player's velocity
    fn ball_contact(&mut self, ball: &mut Body, player: &mut Body, normal: Vec2, impact: f32) {
        let ctx = self.ctx;
        let pitch = ctx.pitch;
        let Some(side) = player.side() else { return };

        if impact > Params::IMPACT_SPARK_THRESHOLD {
            let at = ball.pos + normal * ball.radius();
            sparks(self.events, self.rng, at, normal, impact, ctx.team(side).secondary());
            self.events.sfx(Sfx::BallTouch);
        }

        if player.is_goalie() {
            ball.vel *= Params::SAVE_BOOST;
            let out = pitch.attack_dir(side);
            let along = ball.vel.dot(out);
            if along < 0.0 {
                ball.vel -= out * 2.0 * along;
            }
        }

        self.record_touch(player);

        let bomb_hit = self
            .buffs
            .ball_effect
            .as_ref()
            .is_some_and(|e| e.mechanic == Mechanic::ImpactBomb && e.owner != side);
        if bomb_hit {
            self.explosions.push(ball.pos);
            self.buffs.ball_effect = None;
        }

        if ctx.config.auto_shoot && player.is_outfield() {
            if let Some(kick) = decide_kick(player, ball, &self.snapshot, ctx, self.rng) {
                ball.vel += kick.direction * kick.force;
            }
        }

        let teleport = self
            .buffs
            .find_for_body(player.id, |m| m == Mechanic::TeleportDribble)
            .map(|b| b.id);
        if let Some(id) = teleport {
            self.buffs.remove(id);
            let heading = player.vel.try_normalize().unwrap_or(pitch.attack_dir(side));
            let target = player.pos + heading * Params::TELEPORT_DISTANCE * pitch.scale;
            player.pos = pitch.bounds().clamp_circle(target, player.radius());
            log::debug!("{:?} teleported", player.id);
        }

        fire_charged_shot(ball, player, ctx, self.buffs);

        let strong = player.speed() > Params::STRONG_KICK * ctx.config.max_player_speed;
        let forward = ball.vel.dot(pitch.attack_dir(side)) > 1.0;
        if forward && (strong || ctx.config.auto_shoot) {
            self.stats.get_mut(side).shots += 1;
            self.events.stat(side, StatKind::Shot);
        }
    }

    fn contact(&mut self, a: &mut Body, b: &mut Body) {
        if passes_through(a, b, self.buffs, self.rng) {
            return;
        }
        let (a_vel, b_vel) = (a.vel, b.vel);
        let Some(contact) = collide_pair(a, b) else {
            return;
        };
        if a.is_ball() && !b.is_ball() {
            let impact = (b.vel - b_vel).length();
            self.ball_contact(a, b, contact.normal, impact);
        } else if b.is_ball() && !a.is_ball() {
            let impact = (a.vel - a_vel).length();
            self.ball_contact(b, a, -contact.normal, impact);
        }
    }
}

fn sorted_bodies(world: &World) -> Vec<(Entity, Body)> {
    let mut bodies: Vec<(Entity, Body)> = world.query::<&Body>().iter().map(|(e, b)| (e, *b)).collect();
    bodies.sort_by_key(|(_, b)| b.id);
    bodies
}

/// Resolve goal lines, walls and body contacts for one frame.
///
/// Returns the side that scored, if any. A goal ends resolution for the frame.
pub fn resolve_collisions(
    world: &mut World,
    ctx: &StepContext,
    buffs: &mut BuffState,
    stats: &mut MatchStats,
    events: &mut Events,
    rng: &mut GameRng,
) -> Option<Side> {
    let mut bodies = sorted_bodies(world);
    let mut touches = Touches {
        ctx,
        buffs,
        stats,
        events,
        rng,
        explosions: Vec::new(),
        snapshot: bodies.iter().map(|(_, b)| *b).collect(),
    };
    let mut scored = None;

    for i in 0..bodies.len() {
        {
            let body = &mut bodies[i].1;
            if let Some(side) = body.side().filter(|_| body.is_goalie()) {
                let radius = body.radius();
                ctx.pitch.confine_goalie(side, &mut body.pos, &mut body.vel, radius);
            }
            if body.is_ball() {
                scored = check_goal(body, ctx, touches.buffs, touches.events, &mut touches.explosions);
                if scored.is_some() {
                    break;
                }
            }
            if bounce_off_walls(body, ctx) && body.is_ball() {
                touches.events.sfx(Sfx::WallHit);
            }
        }

        for j in i + 1..bodies.len() {
            let (head, tail) = bodies.split_at_mut(j);
            touches.contact(&mut head[i].1, &mut tail[0].1);
        }
    }

    let explosions = std::mem::take(&mut touches.explosions);
    for (entity, body) in &bodies {
        if let Ok(mut slot) = world.get::<&mut Body>(*entity) {
            *slot = *body;
        }
    }
    for at in explosions {
        explode(world, touches.events, touches.rng, at);
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffs::ActiveBuff;
    use crate::{BallKind, BodyId, BuffCatalog, Config, GameEvent, Pitch, TeamInfo, TeamModifiers, Time};
    use proptest::prelude::*;

    struct Fixture {
        config: Config,
        pitch: Pitch,
        catalog: BuffCatalog,
        teams: [TeamInfo; 2],
        modifiers: [TeamModifiers; 2],
    }

    fn setup_fixture(config: Config) -> Fixture {
        Fixture {
            pitch: Pitch::new(&config),
            config,
            catalog: BuffCatalog::builtin(),
            teams: [
                TeamInfo::new("a", "A", "#ff0000", "#ffffff"),
                TeamInfo::new("b", "B", "#0000ff", "#ffffff"),
            ],
            modifiers: [TeamModifiers::default(); 2],
        }
    }

    fn ctx(f: &Fixture) -> StepContext<'_> {
        StepContext {
            config: &f.config,
            pitch: &f.pitch,
            catalog: &f.catalog,
            teams: &f.teams,
            modifiers: &f.modifiers,
            comeback: None,
            time: Time::default(),
        }
    }

    fn manual() -> Config {
        Config {
            auto_shoot: false,
            ..Config::new()
        }
    }

    fn ball(pos: Vec2, vel: Vec2) -> Body {
        Body::ball(pos, vel, 15.0, BallKind::Classic.profile())
    }

    fn charge(owner: Side, body: BodyId, mechanic: Mechanic) -> ActiveBuff {
        ActiveBuff {
            id: 1,
            owner,
            key: format!("{mechanic:?}"),
            mechanic,
            duration: 999.0 * 60.0,
            initial: 999.0 * 60.0,
            affected: Some(body),
        }
    }

    fn momentum(a: &Body, b: &Body) -> Vec2 {
        a.vel * a.mass + b.vel * b.mass
    }

    #[test]
    fn test_head_on_equal_masses_swap_velocities() {
        let mut a = Body::outfield(Side::A, 0, Vec2::new(100.0, 100.0), Vec2::new(2.0, 0.0), 25.0);
        let mut b = Body::outfield(Side::B, 0, Vec2::new(140.0, 100.0), Vec2::new(-2.0, 0.0), 25.0);

        let contact = collide_pair(&mut a, &mut b).expect("overlapping");
        assert_eq!(contact.normal, Vec2::X);
        assert!((a.vel.x + 2.0).abs() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
        assert!((b.pos.x - a.pos.x - 50.0).abs() < 1e-4, "Pushed apart to touching");
    }

    #[test]
    fn test_separating_bodies_only_pushed_apart() {
        let mut a = Body::outfield(Side::A, 0, Vec2::new(100.0, 100.0), Vec2::new(-1.0, 0.0), 25.0);
        let mut b = Body::outfield(Side::A, 1, Vec2::new(140.0, 100.0), Vec2::new(1.0, 0.0), 25.0);

        let contact = collide_pair(&mut a, &mut b).expect("overlapping");
        assert_eq!(contact.approach, 0.0);
        assert_eq!(a.vel, Vec2::new(-1.0, 0.0));
        assert_eq!(b.vel, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_coincident_centres_use_fallback_normal() {
        let mut a = Body::outfield(Side::A, 0, Vec2::new(100.0, 100.0), Vec2::ZERO, 25.0);
        let mut b = Body::outfield(Side::B, 0, Vec2::new(100.0, 100.0), Vec2::ZERO, 25.0);
        let contact = collide_pair(&mut a, &mut b).expect("overlapping");
        assert_eq!(contact.normal, Vec2::X);
        assert!(a.pos.is_finite() && b.pos.is_finite());
    }

    proptest! {
        #[test]
        fn prop_pair_collision_conserves_momentum(
            ax in 0.0f32..200.0, ay in 0.0f32..200.0,
            dx in -40.0f32..40.0, dy in -40.0f32..40.0,
            vax in -8.0f32..8.0, vay in -8.0f32..8.0,
            vbx in -8.0f32..8.0, vby in -8.0f32..8.0,
            mass in 0.5f32..25.0,
        ) {
            let mut a = Body::outfield(Side::A, 0, Vec2::new(ax, ay), Vec2::new(vax, vay), 25.0);
            let mut b = ball(Vec2::new(ax + dx, ay + dy), Vec2::new(vbx, vby));
            b.mass = mass;
            let before = momentum(&a, &b);

            collide_pair(&mut a, &mut b);

            let after = momentum(&a, &b);
            prop_assert!((before - after).length() < 1e-2 * (1.0 + before.length()));
            prop_assert!(a.vel.is_finite() && b.vel.is_finite());
        }
    }

    #[test]
    fn test_goalie_save_sends_ball_away_from_goal() {
        let f = setup_fixture(manual());
        let mut world = World::new();
        let mut buffs = BuffState::default();
        let mut stats = MatchStats::new();
        stats.last_touch = Some(Side::B);
        let mut events = Events::new();
        let mut rng = GameRng::new(2);
        world.spawn((Body::goalie(Side::A, Vec2::new(60.0, 300.0), 30.0),));
        let b = world.spawn((ball(Vec2::new(100.0, 300.0), Vec2::new(-3.0, 0.0)),));

        let scored = resolve_collisions(&mut world, &ctx(&f), &mut buffs, &mut stats, &mut events, &mut rng);

        assert_eq!(scored, None);
        assert!(world.get::<&Body>(b).expect("ball").vel.x > 0.0, "Save never turns the ball goalward");
        assert_eq!(stats.a.saves, 1);
        assert_eq!(stats.b.shots_on_target, 1);
        assert_eq!(stats.last_touch, Some(Side::A));
        assert!(events.list.contains(&GameEvent::Stat {
            side: Side::A,
            kind: StatKind::Save
        }));
    }

    #[test]
    fn test_wall_bounce_reflects_and_clamps() {
        let f = setup_fixture(manual());
        let mut world = World::new();
        let mut buffs = BuffState::default();
        let mut stats = MatchStats::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(2);
        let b = world.spawn((ball(Vec2::new(500.0, 5.0), Vec2::new(1.0, -4.0)),));

        resolve_collisions(&mut world, &ctx(&f), &mut buffs, &mut stats, &mut events, &mut rng);

        let b = *world.get::<&Body>(b).expect("ball");
        assert_eq!(b.pos.y, 15.0);
        assert!((b.vel.y - 3.0).abs() < 1e-5, "Reflected with the ball's bounciness");
        assert!(events.has_sfx(Sfx::WallHit));
    }

    #[test]
    fn test_goal_reported_and_stops_resolution() {
        let f = setup_fixture(manual());
        let mut world = World::new();
        let mut buffs = BuffState::default();
        let mut stats = MatchStats::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(2);
        world.spawn((ball(Vec2::new(995.0, 300.0), Vec2::new(5.0, 0.0)),));

        let scored = resolve_collisions(&mut world, &ctx(&f), &mut buffs, &mut stats, &mut events, &mut rng);
        assert_eq!(scored, Some(Side::A));
    }

    #[test]
    fn test_ghost_passes_through_opponents_only() {
        let f = setup_fixture(manual());
        let mut world = World::new();
        let mut buffs = BuffState::default();
        let mut stats = MatchStats::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(2);
        let mut ghost = Body::outfield(Side::A, 0, Vec2::new(300.0, 300.0), Vec2::ZERO, 25.0);
        ghost.flags.ghost = true;
        world.spawn((ghost,));
        let opponent = world.spawn((Body::outfield(Side::B, 0, Vec2::new(320.0, 300.0), Vec2::ZERO, 25.0),));
        let mate = world.spawn((Body::outfield(Side::A, 1, Vec2::new(280.0, 300.0), Vec2::ZERO, 25.0),));

        resolve_collisions(&mut world, &ctx(&f), &mut buffs, &mut stats, &mut events, &mut rng);
        assert_eq!(world.get::<&Body>(opponent).expect("opponent").pos, Vec2::new(320.0, 300.0));
        assert_ne!(world.get::<&Body>(mate).expect("mate").pos, Vec2::new(280.0, 300.0));
    }

    #[test]
    fn test_cannonball_fires_heavy_and_slow() {
        let f = setup_fixture(manual());
        let ctx = ctx(&f);
        let mut buffs = BuffState::default();
        let shooter = Body::outfield(Side::A, 0, Vec2::new(300.0, 300.0), Vec2::new(2.0, 0.0), 25.0);
        buffs.active.push(charge(Side::A, shooter.id, Mechanic::Cannonball));
        let mut b = ball(Vec2::new(340.0, 300.0), Vec2::new(3.0, 0.0));

        assert!(fire_charged_shot(&mut b, &shooter, &ctx, &mut buffs));
        assert!(buffs.active.is_empty(), "Charge is consumed");
        assert!((b.speed() - ctx.config.max_player_speed * 1.2).abs() < 1e-4);
        assert_eq!(b.mass, b.base_mass * 10.0);
        let effect = buffs.ball_effect.as_ref().expect("effect set");
        assert_eq!((effect.mechanic, effect.owner), (Mechanic::Cannonball, Side::A));

        assert!(!fire_charged_shot(&mut b, &shooter, &ctx, &mut buffs), "Nothing left to fire");
    }

    #[test]
    fn test_still_ball_fires_toward_target_goal() {
        let f = setup_fixture(manual());
        let ctx = ctx(&f);
        let mut buffs = BuffState::default();
        let shooter = Body::outfield(Side::B, 2, Vec2::new(600.0, 300.0), Vec2::ZERO, 25.0);
        buffs.active.push(charge(Side::B, shooter.id, Mechanic::Comet));
        let mut b = ball(Vec2::new(560.0, 300.0), Vec2::ZERO);

        fire_charged_shot(&mut b, &shooter, &ctx, &mut buffs);
        assert!((b.vel.x + ctx.config.max_player_speed * 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_bomb_explodes_on_opposing_touch() {
        let f = setup_fixture(manual());
        let mut world = World::new();
        let mut buffs = BuffState::default();
        buffs.ball_effect = Some(BallEffect::new("BOMBA_DE_IMPACTO".into(), Mechanic::ImpactBomb, Side::A));
        let mut stats = MatchStats::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(2);
        world.spawn((ball(Vec2::new(500.0, 300.0), Vec2::new(2.0, 0.0)),));
        world.spawn((Body::outfield(Side::B, 0, Vec2::new(530.0, 300.0), Vec2::ZERO, 25.0),));
        let bystander = world.spawn((Body::outfield(Side::A, 5, Vec2::new(500.0, 400.0), Vec2::ZERO, 25.0),));

        resolve_collisions(&mut world, &ctx(&f), &mut buffs, &mut stats, &mut events, &mut rng);

        assert!(buffs.ball_effect.is_none());
        assert!(events.particles.len() >= 50, "Blast particles queued");
        assert!(world.get::<&Body>(bystander).expect("bystander").vel.y > 0.0, "Blast pushes players away");
    }

    #[test]
    fn test_auto_shoot_counts_shot() {
        let f = setup_fixture(Config::new());
        let mut world = World::new();
        let mut buffs = BuffState::default();
        let mut stats = MatchStats::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(2);
        world.spawn((ball(Vec2::new(830.0, 300.0), Vec2::ZERO),));
        world.spawn((Body::outfield(Side::A, 0, Vec2::new(800.0, 300.0), Vec2::new(1.0, 0.0), 25.0),));

        resolve_collisions(&mut world, &ctx(&f), &mut buffs, &mut stats, &mut events, &mut rng);
        assert_eq!(stats.a.touches, 1);
        assert_eq!(stats.a.shots, 1);
    }

    #[test]
    fn test_auto_kick_keeps_incoming_momentum() {
        let f = setup_fixture(Config::new());
        let mut world = World::new();
        let mut buffs = BuffState::default();
        let mut stats = MatchStats::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(4);
        let b = world.spawn((ball(Vec2::new(505.0, 300.0), Vec2::new(0.0, 8.0)),));
        world.spawn((Body::outfield(Side::A, 0, Vec2::new(470.0, 300.0), Vec2::new(1.0, 0.0), 25.0),));

        resolve_collisions(&mut world, &ctx(&f), &mut buffs, &mut stats, &mut events, &mut rng);
        assert_eq!(stats.a.touches, 1);
        let vel = world.get::<&Body>(b).expect("ball").vel;
        assert!(vel.y > 4.0, "Cross keeps travelling across: {vel:?}");
        assert!(vel.x > 0.0, "Touch pushes it upfield: {vel:?}");
    }
}
