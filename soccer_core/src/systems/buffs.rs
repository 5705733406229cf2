use glam::Vec2;
use hecs::World;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::buffs::Mechanic;
use crate::{
    Body, BodyId, BuffState, Events, FieldBuff, GameEvent, GameRng, Lifetime, Params, Side, StepContext, TrapKind,
};

/// Pool entries that may appear on the pitch right now
pub fn spawn_candidates<'a>(ctx: &StepContext, buffs: &'a BuffState, on_field: &[String]) -> Vec<&'a str> {
    buffs
        .pool
        .iter()
        .filter(|key| {
            let Some(def) = ctx.catalog.get(key) else {
                return false;
            };
            if def.permanent && buffs.claimed.contains(*key) {
                return false;
            }
            if def.unique && (on_field.contains(*key) || buffs.active.iter().any(|b| &b.key == *key)) {
                return false;
            }
            true
        })
        .map(String::as_str)
        .collect()
}

/// Place a random eligible buff on the pitch every spawn interval
pub fn spawn_buffs(world: &mut World, ctx: &StepContext, buffs: &mut BuffState, events: &mut Events, rng: &mut GameRng) {
    if !ctx.config.buffs_enabled {
        return;
    }
    let on_field: Vec<String> = world
        .query::<&FieldBuff>()
        .iter()
        .map(|(_, b)| b.key.clone())
        .collect();

    let candidates: Vec<String> = spawn_candidates(ctx, buffs, &on_field)
        .into_iter()
        .map(String::from)
        .collect();
    if candidates.is_empty() {
        return;
    }

    buffs.spawn_timer += ctx.time.dt;
    if buffs.spawn_timer < ctx.config.buff_spawn_frames {
        return;
    }
    buffs.spawn_timer = 0.0;
    if on_field.len() >= Params::MAX_BUFFS_ON_FIELD {
        return;
    }
    let Some(key) = candidates.choose(&mut rng.0).cloned() else {
        return;
    };

    let Some(mechanic) = ctx.catalog.mechanic(&key) else {
        return;
    };
    let pitch = ctx.pitch;
    let margin_len = Params::BUFF_MARGIN_LENGTH * pitch.scale;
    let margin_span = Params::BUFF_MARGIN_SPAN * pitch.scale;
    let depth = rng.0.gen_range(margin_len..pitch.length() - margin_len);
    let across = rng.0.gen_range(margin_span..pitch.span() - margin_span);

    let id = buffs.next_id();
    world.spawn((
        FieldBuff {
            id,
            key: key.clone(),
            mechanic,
            pos: pitch.side_point(Side::A, depth, across),
            radius: Params::BUFF_RADIUS * pitch.scale,
            trap: None,
        },
        Lifetime::new(Params::BUFF_LIFESPAN_FRAMES),
    ));
    log::debug!("spawned buff {key}");
    events.push(GameEvent::BuffSpawned { key });
}

/// Rebuild every body's size, mass and speed from ratings and the comeback state
pub fn reset_body_modifiers(world: &mut World, ctx: &StepContext) {
    for (_entity, body) in world.query_mut::<&mut Body>() {
        body.reset_modifiers();
        let Some(side) = body.side() else { continue };
        let mods = ctx.mods(side);
        body.mass *= mods.strength;
        body.size *= mods.size;
        body.speed_factor *= mods.speed;
        if ctx.in_comeback(side) {
            body.mass *= Params::COMEBACK_MASS;
            body.size *= Params::COMEBACK_SIZE;
            body.speed_factor *= Params::COMEBACK_SPEED;
        }
    }
}

fn apply_team_buff(body: &mut Body, mechanic: Mechanic, own: bool) {
    let keeper = body.is_goalie();
    match mechanic {
        Mechanic::SpeedAdvantage if own => body.speed_factor *= 1.5,
        Mechanic::SlowGame if !own => body.speed_factor *= 0.6,
        Mechanic::TeamGiants if own && !keeper => body.size *= 1.25,
        Mechanic::ShrinkOpponent if !own && !keeper => body.size *= 0.75,
        Mechanic::GiantGoalie if own && keeper => body.size *= 2.0,
        Mechanic::ShrinkGoalie if !own && keeper => body.size *= 0.6,
        Mechanic::BlindGoalie if !own && keeper => body.flags.blinded = true,
        Mechanic::InvertGoalie if !own && keeper => body.flags.confused = true,
        Mechanic::ReverseMagnet if !own && keeper => body.flags.repels_ball = true,
        _ => {}
    }
}

fn apply_body_buff(body: &mut Body, mechanic: Mechanic) {
    match mechanic {
        Mechanic::GhostDribble => body.flags.ghost = true,
        Mechanic::Confuse => body.flags.confused = true,
        Mechanic::Freeze => body.flags.frozen = true,
        Mechanic::Veteran => {
            body.mass *= 1.2;
            body.speed_factor *= 1.1;
        }
        _ => {}
    }
}

/// Re-apply every active buff and the ball effect to the bodies
pub fn apply_active_buffs(world: &mut World, buffs: &BuffState) {
    for (_entity, body) in world.query_mut::<&mut Body>() {
        let Some(side) = body.side() else {
            if let Some(effect) = &buffs.ball_effect {
                if let Some(factor) = effect.mechanic.ball_mass_factor() {
                    body.mass = body.base_mass * factor;
                }
                if effect.mechanic == Mechanic::PhantomShot {
                    let progress = effect.progress();
                    body.flags.invisible = progress > 0.2 && progress < 0.8;
                }
            }
            continue;
        };

        for buff in &buffs.active {
            match buff.affected {
                Some(id) if id == body.id => apply_body_buff(body, buff.mechanic),
                Some(_) => {}
                None => apply_team_buff(body, buff.mechanic, buff.owner == side),
            }
        }
    }
}

/// Radial push on `target` away from `origin`, `force(d²)` per unit offset
fn push_away(target: &mut Body, origin: Vec2, radius: f32, force: impl Fn(f32) -> f32) {
    let offset = target.pos - origin;
    let dist_sq = offset.length_squared();
    if dist_sq < radius * radius && dist_sq > 1.0 {
        target.vel += offset * force(dist_sq);
    }
}

/// Force fields that act on players before integration
pub fn apply_force_fields(world: &mut World, ctx: &StepContext, buffs: &BuffState, events: &mut Events) {
    let mut bodies: Vec<&mut Body> = world.query_mut::<&mut Body>().into_iter().map(|(_, b)| b).collect();
    bodies.sort_by_key(|b| b.id);
    let Some(ball_index) = bodies.iter().position(|b| b.is_ball()) else {
        return;
    };
    let (ball_pos, ball_vel, ball_radius) = {
        let ball = &bodies[ball_index];
        (ball.pos, ball.vel, ball.radius())
    };

    // Bulldozer and tiger shots plough opponents out of the way
    if let Some(effect) = &buffs.ball_effect {
        let factor = match effect.mechanic {
            Mechanic::Bulldozer => Some(1.0),
            Mechanic::Tiger => Some(1.5),
            _ => None,
        };
        if let Some(factor) = factor {
            for body in bodies.iter_mut() {
                if body.side().is_some_and(|s| s != effect.owner) {
                    push_away(body, ball_pos, ball_radius + 60.0, |d2| 120.0 / (d2 + 10.0) * factor);
                }
            }
        }
    }

    // Repulsor fields around single bodies
    for buff in buffs.active.iter().filter(|b| b.mechanic == Mechanic::RepulsorField) {
        let Some(origin) = buff.affected.and_then(|id| bodies.iter().find(|b| b.id == id).map(|b| b.pos)) else {
            continue;
        };
        for body in bodies.iter_mut() {
            if body.side().is_some_and(|s| s != buff.owner) {
                push_away(body, origin, 120.0, |d2| 60.0 / (d2 + 100.0));
            }
        }
    }

    for side in Side::BOTH {
        // The last defender reads shots at goal
        if buffs.team_has(Mechanic::GoalieInstinct, side) && ball_vel.dot(ctx.pitch.attack_dir(side)) < -0.5 {
            let player_r = ctx.config.player_size * ctx.pitch.scale;
            let rearmost = bodies
                .iter_mut()
                .filter(|b| b.side() == Some(side) && b.is_outfield())
                .min_by(|a, b| {
                    let da = ctx.pitch.depth_from_goal(side, a.pos);
                    let db = ctx.pitch.depth_from_goal(side, b.pos);
                    da.total_cmp(&db)
                });
            if let Some(defender) = rearmost {
                let depth = ctx.pitch.depth_from_goal(side, ball_pos).max(player_r * 3.0);
                let target = ctx.pitch.side_point(side, depth, ctx.pitch.across(ball_pos));
                let delta = target - defender.pos;
                if delta.length() > 1.0 {
                    defender.vel += delta.normalize_or_zero() * 0.8;
                }
            }
        }

        if buffs.team_has(Mechanic::AreaEarthquake, side)
            && ctx.pitch.in_penalty_area(side.opponent(), ball_pos)
            && ctx.config.screen_shake
        {
            events.push(GameEvent::ScreenShake { intensity: 10.0 });
        }
    }
}

/// Force fields that act on the ball after integration, plus the gel trap
pub fn apply_ball_fields(world: &mut World, buffs: &BuffState, rng: &mut GameRng) {
    let gels: Vec<FieldBuff> = world
        .query::<&FieldBuff>()
        .iter()
        .filter(|(_, b)| b.trap.is_some_and(|t| t.kind == TrapKind::SlipperyGel))
        .map(|(_, b)| b.clone())
        .collect();

    let mut bodies: Vec<&mut Body> = world.query_mut::<&mut Body>().into_iter().map(|(_, b)| b).collect();
    bodies.sort_by_key(|b| b.id);

    for gel in &gels {
        let Some(trap) = gel.trap else { continue };
        for body in bodies.iter_mut() {
            if body.id == BodyId::Goalie(trap.owner.opponent()) && body.pos.distance(gel.pos) < gel.radius {
                body.vel += Vec2::new(rng.jitter(Params::GEL_JITTER), rng.jitter(Params::GEL_JITTER));
            }
        }
    }

    let Some(ball_index) = bodies.iter().position(|b| b.is_ball()) else {
        return;
    };
    let ball_pos = bodies[ball_index].pos;
    let mut pull = Vec2::ZERO;

    for body in bodies.iter().filter(|b| !b.is_ball()) {
        let Some(side) = body.side() else { continue };
        let offset = body.pos - ball_pos;
        let dist_sq = offset.length_squared();
        if dist_sq <= 1.0 {
            continue;
        }
        if buffs.team_has(Mechanic::MagneticBall, side) && dist_sq < 300.0 * 300.0 {
            pull += offset * (40.0 / dist_sq);
        }
        if body.flags.repels_ball && dist_sq < 200.0 * 200.0 {
            pull -= offset * (35.0 / dist_sq);
        }
    }
    bodies[ball_index].vel += pull;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffs::ActiveBuff;
    use crate::{BallKind, BuffCatalog, Config, Pitch, TeamInfo, TeamModifiers, Time};

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

    fn team_buff(id: u32, owner: Side, mechanic: Mechanic) -> ActiveBuff {
        ActiveBuff {
            id,
            owner,
            key: format!("{mechanic:?}"),
            mechanic,
            duration: 600.0,
            initial: 600.0,
            affected: None,
        }
    }

    #[test]
    fn test_permanent_excluded_once_claimed() {
        let f = setup_fixture(Config::new());
        let ctx = ctx(&f);
        let mut buffs = BuffState::new(vec!["JOGADOR_CASCUDO".into(), "SPEED_ADVANTAGE".into()]);
        assert_eq!(spawn_candidates(&ctx, &buffs, &[]).len(), 2);

        buffs.claimed.insert("JOGADOR_CASCUDO".into());
        assert_eq!(spawn_candidates(&ctx, &buffs, &[]), vec!["SPEED_ADVANTAGE"]);
    }

    #[test]
    fn test_unique_excluded_while_present() {
        let f = setup_fixture(Config::new());
        let ctx = ctx(&f);
        let buffs = BuffState::new(vec!["MAO_FANTASMA".into()]);
        assert_eq!(spawn_candidates(&ctx, &buffs, &[]).len(), 1);
        assert!(spawn_candidates(&ctx, &buffs, &["MAO_FANTASMA".to_string()]).is_empty());
    }

    #[test]
    fn test_spawn_on_interval_within_margins() {
        let config = Config {
            buffs_enabled: true,
            ..Config::new()
        };
        let f = setup_fixture(config);
        let ctx = ctx(&f);
        let mut world = World::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(9);
        let mut buffs = BuffState::new(vec!["SPEED_ADVANTAGE".into()]);

        for _ in 0..599 {
            spawn_buffs(&mut world, &ctx, &mut buffs, &mut events, &mut rng);
        }
        assert_eq!(world.query::<&FieldBuff>().iter().count(), 0);

        spawn_buffs(&mut world, &ctx, &mut buffs, &mut events, &mut rng);
        let spawned: Vec<FieldBuff> = world.query::<&FieldBuff>().iter().map(|(_, b)| b.clone()).collect();
        assert_eq!(spawned.len(), 1);
        let pos = spawned[0].pos;
        assert!((100.0..=900.0).contains(&pos.x) && (50.0..=550.0).contains(&pos.y));
        assert!(events.list.contains(&GameEvent::BuffSpawned {
            key: "SPEED_ADVANTAGE".into()
        }));
        assert_eq!(buffs.spawn_timer, 0.0);
    }

    #[test]
    fn test_spawn_capped_at_four() {
        let config = Config {
            buffs_enabled: true,
            buff_spawn_frames: 60.0,
            ..Config::new()
        };
        let f = setup_fixture(config);
        let ctx = ctx(&f);
        let mut world = World::new();
        let mut events = Events::new();
        let mut rng = GameRng::new(9);
        let mut buffs = BuffState::new(vec!["SPEED_ADVANTAGE".into(), "SLOW_GAME".into()]);

        for _ in 0..60 * 10 {
            spawn_buffs(&mut world, &ctx, &mut buffs, &mut events, &mut rng);
        }
        assert_eq!(world.query::<&FieldBuff>().iter().count(), Params::MAX_BUFFS_ON_FIELD);
    }

    #[test]
    fn test_team_buffs_target_the_right_bodies() {
        let f = setup_fixture(Config::new());
        let mut world = World::new();
        let a_player = world.spawn((Body::outfield(Side::A, 0, Vec2::ZERO, Vec2::ZERO, 25.0),));
        let b_player = world.spawn((Body::outfield(Side::B, 0, Vec2::ZERO, Vec2::ZERO, 25.0),));
        let b_keeper = world.spawn((Body::goalie(Side::B, Vec2::ZERO, 30.0),));

        let mut buffs = BuffState::default();
        buffs.active.push(team_buff(1, Side::A, Mechanic::TeamGiants));
        buffs.active.push(team_buff(2, Side::A, Mechanic::SlowGame));
        buffs.active.push(team_buff(3, Side::A, Mechanic::BlindGoalie));

        reset_body_modifiers(&mut world, &ctx(&f));
        apply_active_buffs(&mut world, &buffs);

        let get = |e| *world.get::<&Body>(e).expect("body");
        assert_eq!(get(a_player).size, 1.25);
        assert_eq!(get(a_player).speed_factor, 1.0);
        assert_eq!(get(b_player).speed_factor, 0.6);
        assert!(get(b_keeper).flags.blinded);
        assert!(!get(b_player).flags.blinded);
    }

    #[test]
    fn test_modifiers_reset_each_frame() {
        let f = setup_fixture(Config::new());
        let mut world = World::new();
        let e = world.spawn((Body::outfield(Side::A, 0, Vec2::ZERO, Vec2::ZERO, 25.0),));
        let mut buffs = BuffState::default();
        buffs.active.push(ActiveBuff {
            affected: Some(BodyId::Outfield(Side::A, 0)),
            ..team_buff(1, Side::B, Mechanic::Freeze)
        });

        reset_body_modifiers(&mut world, &ctx(&f));
        apply_active_buffs(&mut world, &buffs);
        assert!(world.get::<&Body>(e).expect("body").flags.frozen);

        buffs.active.clear();
        reset_body_modifiers(&mut world, &ctx(&f));
        apply_active_buffs(&mut world, &buffs);
        assert!(!world.get::<&Body>(e).expect("body").flags.frozen);
    }

    #[test]
    fn test_comeback_boosts_keeper_and_outfield_alike() {
        let f = setup_fixture(Config::new());
        let mut world = World::new();
        let keeper = world.spawn((Body::goalie(Side::A, Vec2::new(62.5, 300.0), 30.0),));
        let player = world.spawn((Body::outfield(Side::A, 0, Vec2::ZERO, Vec2::ZERO, 25.0),));
        let rival = world.spawn((Body::goalie(Side::B, Vec2::new(937.5, 300.0), 30.0),));
        let ctx = StepContext {
            comeback: Some(Side::A),
            ..ctx(&f)
        };

        reset_body_modifiers(&mut world, &ctx);

        for entity in [keeper, player] {
            let body = *world.get::<&Body>(entity).expect("body");
            assert!((body.mass - body.base_mass * Params::COMEBACK_MASS).abs() < 1e-4, "{:?} mass", body.id);
            assert_eq!(body.size, Params::COMEBACK_SIZE, "{:?} size", body.id);
            assert_eq!(body.speed_factor, Params::COMEBACK_SPEED, "{:?} speed", body.id);
        }
        let rival = *world.get::<&Body>(rival).expect("body");
        assert_eq!((rival.mass, rival.size, rival.speed_factor), (rival.base_mass, 1.0, 1.0));
    }

    #[test]
    fn test_magnet_pulls_ball_toward_owner() {
        let mut world = World::new();
        let profile = BallKind::Classic.profile();
        world.spawn((Body::outfield(Side::A, 0, Vec2::new(100.0, 100.0), Vec2::ZERO, 25.0),));
        let ball = world.spawn((Body::ball(Vec2::new(200.0, 100.0), Vec2::ZERO, 15.0, profile),));
        let mut buffs = BuffState::default();
        buffs.active.push(team_buff(1, Side::A, Mechanic::MagneticBall));

        apply_ball_fields(&mut world, &buffs, &mut GameRng::new(1));
        let vel = world.get::<&Body>(ball).expect("ball").vel;
        assert!((vel.x + 0.4).abs() < 1e-5, "40/d² per unit offset toward the player");
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_earthquake_shakes_when_ball_in_opponent_area() {
        let f = setup_fixture(Config::new());
        let mut world = World::new();
        let profile = BallKind::Classic.profile();
        world.spawn((Body::ball(Vec2::new(950.0, 300.0), Vec2::ZERO, 15.0, profile),));
        let mut buffs = BuffState::default();
        buffs.active.push(team_buff(1, Side::A, Mechanic::AreaEarthquake));
        let mut events = Events::new();

        apply_force_fields(&mut world, &ctx(&f), &buffs, &mut events);
        assert!(events.list.iter().any(|e| matches!(e, GameEvent::ScreenShake { .. })));
    }
}
