//! Match loop owner
//!
//! `MatchSim` holds the world and every per-match resource, and turns one
//! display-frame callback into clock advancement plus, while play is live,
//! one simulation step.

use hecs::World;
use serde::Serialize;

use crate::error::Result;
use crate::systems::{advance_particles, award_goal, clear_particles, emit_particles, fireworks};
use crate::{
    comeback_side, random_velocity, spawn_kickoff, step, team_modifiers, Body, BuffCatalog, BuffState, Config,
    Events, FieldBuff, GameEvent, GameRng, MatchClock, MatchPhase, MatchStats, Params, Pitch, Score, Sfx, Side,
    StepContext, TeamInfo, TeamModifiers, Time, TransitionResult, Winner,
};

/// Active buff as the HUD shows it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuffHud {
    pub key: String,
    pub name: String,
    pub symbol: String,
    pub color: String,
    pub side: Side,
    /// Remaining share of the duration, 0..=1
    pub ratio: f32,
}

/// Scoreboard and overlay state for the current frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scoreboard {
    pub phase: MatchPhase,
    pub clock: String,
    pub countdown: u8,
    pub score: Score,
    pub stats: MatchStats,
    pub possession: [f32; 2],
    pub winner: Option<Winner>,
    pub paused: bool,
    pub tutorial: bool,
    pub celebrating: bool,
    pub sudden_death: bool,
}

pub struct MatchSim {
    pub world: World,
    pub time: Time,
    pub pitch: Pitch,
    pub config: Config,
    pub catalog: BuffCatalog,
    pub teams: [TeamInfo; 2],
    pub modifiers: [TeamModifiers; 2],
    pub score: Score,
    pub stats: MatchStats,
    pub clock: MatchClock,
    pub buffs: BuffState,
    pub events: Events,
    pub rng: GameRng,
    /// Real ms left in the post-goal celebration
    goal_pause_ms: f32,
    /// Real ms until the ball is released after the second-half restart
    kickoff_delay_ms: f32,
    /// Real ms left on the first-pickup tutorial pause
    tutorial_ms: f32,
}

impl MatchSim {
    pub fn new(config: Config, teams: [TeamInfo; 2], catalog: BuffCatalog, seed: u64) -> Result<Self> {
        for team in &teams {
            team.validate()?;
        }
        let config = config.sanitized();
        let pitch = Pitch::new(&config);
        let modifiers = team_modifiers(&config, &teams);
        let mut sim = Self {
            world: World::new(),
            time: Time::new(config.game_speed, 0.0),
            clock: MatchClock::new(&config),
            pitch,
            config,
            catalog,
            teams,
            modifiers,
            score: Score::new(),
            stats: MatchStats::new(),
            buffs: BuffState::default(),
            events: Events::new(),
            rng: GameRng::new(seed),
            goal_pause_ms: 0.0,
            kickoff_delay_ms: 0.0,
            tutorial_ms: 0.0,
        };
        spawn_kickoff(&mut sim.world, &sim.pitch, &sim.config, &mut sim.rng, false);
        log::info!("match ready: {} vs {}", sim.teams[0].name, sim.teams[1].name);
        Ok(sim)
    }

    /// Build from the JSON bundles the setup screen hands over
    pub fn from_json(config: &str, team_a: &str, team_b: &str, custom_buffs: Option<&str>, seed: u64) -> Result<Self> {
        let config = Config::from_json(config)?;
        let teams = [TeamInfo::from_json(team_a)?, TeamInfo::from_json(team_b)?];
        let mut catalog = BuffCatalog::builtin();
        if let Some(json) = custom_buffs {
            let added = catalog.extend_from_json(json)?;
            log::info!("added {added} custom buffs");
        }
        Self::new(config, teams, catalog, seed)
    }

    /// Leave the pre-game screen and line the teams up
    pub fn start_match(&mut self) {
        if self.clock.phase() != MatchPhase::PreGame {
            log::warn!("start_match ignored in {:?}", self.clock.phase());
            return;
        }
        let pool = self.catalog.draw_pool(&mut self.rng);
        log::debug!("buff pool: {pool:?}");
        self.buffs.reset(pool);
        spawn_kickoff(&mut self.world, &self.pitch, &self.config, &mut self.rng, true);
        let result = self.clock.start(self.config.use_real_ratings);
        self.on_transition(result);
    }

    /// Same teams and settings, fresh match
    pub fn restart(&mut self) {
        self.reset_to_menu();
        self.start_match();
    }

    /// Tear everything down back to pre-game
    pub fn reset_to_menu(&mut self) {
        self.clock.reset();
        self.world.clear();
        self.score = Score::new();
        self.stats = MatchStats::new();
        self.buffs.reset(Vec::new());
        self.events.clear();
        self.time = Time::new(self.config.game_speed, 0.0);
        self.goal_pause_ms = 0.0;
        self.kickoff_delay_ms = 0.0;
        self.tutorial_ms = 0.0;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.clock.toggle_pause()
    }

    /// User pause or tutorial pause
    pub fn is_effectively_paused(&self) -> bool {
        self.clock.paused || self.tutorial_ms > 0.0
    }

    pub fn is_celebrating(&self) -> bool {
        self.goal_pause_ms > 0.0
    }

    /// Advance by one display frame of `real_dt_ms` wall-clock milliseconds
    pub fn frame(&mut self, real_dt_ms: f32) -> &[GameEvent] {
        self.events.clear();
        let real_dt = if real_dt_ms.is_finite() {
            real_dt_ms.clamp(0.0, Params::MAX_FRAME_MS)
        } else {
            0.0
        };

        if self.tutorial_ms > 0.0 && !self.clock.paused {
            self.tutorial_ms = (self.tutorial_ms - real_dt).max(0.0);
        }
        let paused = self.is_effectively_paused();

        let ball_in_area = self.ball().is_some_and(|b| self.pitch.in_any_penalty_area(b.pos));
        let transitions = self
            .clock
            .advance(real_dt, paused, ball_in_area, &self.score, &mut self.rng);
        for result in transitions {
            self.on_transition(result);
        }
        if paused {
            return &self.events.list;
        }

        let dt = self.config.game_speed;
        advance_particles(&mut self.world, dt);

        if self.kickoff_delay_ms > 0.0 {
            self.kickoff_delay_ms -= real_dt;
            if self.kickoff_delay_ms <= 0.0 {
                self.kickoff_delay_ms = 0.0;
                self.release_ball();
            }
        }

        if self.goal_pause_ms > 0.0 {
            self.goal_pause_ms -= real_dt;
            if self.goal_pause_ms <= 0.0 {
                self.goal_pause_ms = 0.0;
                self.kickoff();
            }
            return &self.events.list;
        }

        if !self.clock.phase().is_timed() {
            return &self.events.list;
        }

        self.time.dt = dt;
        self.time.now += dt;
        let ctx = StepContext {
            config: &self.config,
            pitch: &self.pitch,
            catalog: &self.catalog,
            teams: &self.teams,
            modifiers: &self.modifiers,
            comeback: comeback_side(&self.score),
            time: self.time,
        };
        let scored = step(
            &mut self.world,
            &ctx,
            &mut self.buffs,
            &mut self.stats,
            &mut self.events,
            &mut self.rng,
        );

        if self.config.buff_tutorial
            && self
                .events
                .list
                .iter()
                .any(|e| matches!(e, GameEvent::FirstBuffPickup { .. }))
        {
            self.tutorial_ms = Params::TUTORIAL_PAUSE_MS;
        }
        if let Some(side) = scored {
            self.on_goal(side);
        }
        &self.events.list
    }

    fn on_transition(&mut self, result: TransitionResult) {
        if !result.success {
            return;
        }
        self.events.push(GameEvent::PhaseChanged {
            from: result.from,
            to: result.to,
        });
        match result.to {
            MatchPhase::FirstHalf => self.events.sfx(Sfx::MatchStart),
            MatchPhase::HalfTime => self.events.sfx(Sfx::HalfTime),
            MatchPhase::SecondHalf => {
                self.events.sfx(Sfx::SecondHalfStart);
                self.goal_pause_ms = 0.0;
                spawn_kickoff(&mut self.world, &self.pitch, &self.config, &mut self.rng, false);
                self.kickoff_delay_ms = Params::KICKOFF_DELAY_MS;
            }
            MatchPhase::FullTime => self.events.sfx(Sfx::MatchEnd),
            _ => {}
        }
    }

    fn on_goal(&mut self, side: Side) {
        award_goal(&mut self.score, &mut self.stats, side, &mut self.events);
        self.buffs.ball_effect = None;
        if self.config.screen_shake {
            self.events.push(GameEvent::ScreenShake { intensity: 20.0 });
        }
        fireworks(
            &mut self.events,
            &mut self.rng,
            &self.pitch,
            side,
            &self.teams[side.index()],
        );
        emit_particles(&mut self.world, &mut self.events);
        self.goal_pause_ms = self.config.goal_pause_ms();
    }

    /// Back to the formation after a goal. Score, phase and stats carry over,
    /// as do claimed permanent buffs.
    fn kickoff(&mut self) {
        let field: Vec<hecs::Entity> = self.world.query::<&FieldBuff>().iter().map(|(e, _)| e).collect();
        for entity in field {
            let _ = self.world.despawn(entity);
        }
        clear_particles(&mut self.world);
        self.buffs.clear_for_kickoff();
        self.stats.last_touch = None;
        spawn_kickoff(&mut self.world, &self.pitch, &self.config, &mut self.rng, true);
        log::debug!("kickoff at {}", self.clock.display_time());
    }

    fn release_ball(&mut self) {
        let vel = random_velocity(&self.config, &mut self.rng);
        for (_entity, body) in self.world.query_mut::<&mut Body>() {
            if body.is_ball() {
                body.vel = vel;
            }
        }
    }

    pub fn ball(&self) -> Option<Body> {
        self.world
            .query::<&Body>()
            .iter()
            .find(|(_, b)| b.is_ball())
            .map(|(_, b)| *b)
    }

    /// Every body, in id order
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies: Vec<Body> = self.world.query::<&Body>().iter().map(|(_, b)| *b).collect();
        bodies.sort_by_key(|b| b.id);
        bodies
    }

    pub fn field_buffs(&self) -> Vec<FieldBuff> {
        let mut buffs: Vec<FieldBuff> = self
            .world
            .query::<&FieldBuff>()
            .iter()
            .map(|(_, b)| b.clone())
            .collect();
        buffs.sort_by_key(|b| b.id);
        buffs
    }

    /// Active buffs with their remaining ratio, for the HUD
    pub fn active_buffs(&self) -> Vec<BuffHud> {
        self.buffs
            .active
            .iter()
            .map(|buff| {
                let def = self.catalog.get(&buff.key);
                BuffHud {
                    key: buff.key.clone(),
                    name: def.map_or_else(|| buff.key.clone(), |d| d.name.clone()),
                    symbol: def.map(|d| d.symbol.clone()).unwrap_or_default(),
                    color: def.map(|d| d.color.clone()).unwrap_or_default(),
                    side: buff.owner,
                    ratio: buff.ratio(),
                }
            })
            .collect()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        Scoreboard {
            phase: self.clock.phase(),
            clock: self.clock.display_time(),
            countdown: self.clock.countdown,
            score: self.score,
            stats: self.stats,
            possession: [
                self.stats.possession_percent(Side::A),
                self.stats.possession_percent(Side::B),
            ],
            winner: self.clock.winner(),
            paused: self.clock.paused,
            tutorial: self.tutorial_ms > 0.0,
            celebrating: self.is_celebrating(),
            sudden_death: self.clock.in_sudden_death(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_sim(config: Config) -> MatchSim {
        let teams = [
            TeamInfo::new("a", "A", "#ff0000", "#ffffff"),
            TeamInfo::new("b", "B", "#0000ff", "#ffffff"),
        ];
        MatchSim::new(config, teams, BuffCatalog::builtin(), 7).expect("valid teams")
    }

    fn run_until(sim: &mut MatchSim, phase: MatchPhase, max_frames: usize) {
        for _ in 0..max_frames {
            if sim.clock.phase() == phase {
                return;
            }
            sim.frame(16.0);
        }
    }

    #[test]
    fn test_start_counts_down_into_first_half() {
        let mut sim = setup_sim(Config::new());
        sim.start_match();
        assert_eq!(sim.clock.phase(), MatchPhase::Countdown);
        assert_eq!(sim.buffs.pool.len(), 6, "Two buffs per category");

        let mut saw_start = false;
        for _ in 0..200 {
            saw_start |= sim.frame(16.0).contains(&GameEvent::Sfx { name: Sfx::MatchStart });
        }
        assert_eq!(sim.clock.phase(), MatchPhase::FirstHalf);
        assert!(saw_start);
    }

    #[test]
    fn test_bodies_hold_still_before_kickoff() {
        let mut sim = setup_sim(Config::new());
        sim.start_match();
        let before = sim.bodies();
        sim.frame(16.0);
        assert_eq!(before, sim.bodies(), "Nothing moves during the countdown");
    }

    #[test]
    fn test_invalid_team_rejected() {
        let teams = [
            TeamInfo::new("", "A", "#ff0000", "#ffffff"),
            TeamInfo::new("b", "B", "#0000ff", "#ffffff"),
        ];
        assert!(MatchSim::new(Config::new(), teams, BuffCatalog::builtin(), 1).is_err());
    }

    #[test]
    fn test_goal_pause_then_kickoff() {
        let mut sim = setup_sim(Config::new());
        sim.start_match();
        run_until(&mut sim, MatchPhase::FirstHalf, 300);

        for (_e, body) in sim.world.query_mut::<&mut Body>() {
            if body.is_ball() {
                body.pos = glam::Vec2::new(990.0, 300.0);
                body.vel = glam::Vec2::new(6.0, 0.0);
            }
        }
        let events = sim.frame(16.0).to_vec();
        assert!(events.contains(&GameEvent::GoalScored { side: Side::A }));
        assert_eq!(sim.score.get(Side::A), 1);
        assert!(sim.is_celebrating());

        let frames = (sim.config.goal_pause_ms() / 16.0).ceil() as usize;
        for _ in 0..frames {
            sim.frame(16.0);
        }
        assert!(!sim.is_celebrating(), "Pause over after {frames} frames");
        assert_eq!(sim.ball().expect("ball").pos.x, sim.pitch.center().x, "Ball back on the spot");
        assert_eq!(sim.score.get(Side::A), 1, "Score survives the kickoff");
    }

    #[test]
    fn test_reset_to_menu_clears_everything() {
        let mut sim = setup_sim(Config::new());
        sim.start_match();
        run_until(&mut sim, MatchPhase::FirstHalf, 300);
        sim.score.increment(Side::B);

        sim.reset_to_menu();
        assert_eq!(sim.clock.phase(), MatchPhase::PreGame);
        assert_eq!(sim.score, Score::new());
        assert_eq!(sim.world.len(), 0);
        assert!(sim.buffs.active.is_empty());

        sim.start_match();
        assert_eq!(sim.clock.phase(), MatchPhase::Countdown);
        assert_eq!(sim.bodies().len(), 23);
    }

    #[test]
    fn test_showcase_when_ratings_are_real() {
        let config = Config {
            use_real_ratings: true,
            ..Config::new()
        };
        let mut sim = setup_sim(config);
        sim.start_match();
        assert_eq!(sim.clock.phase(), MatchPhase::RatingsShowcase);
    }

    #[test]
    fn test_active_buffs_hud() {
        let mut sim = setup_sim(Config::new());
        let id = sim.buffs.next_id();
        sim.buffs.active.push(crate::buffs::ActiveBuff {
            id,
            owner: Side::B,
            key: "SLOW_GAME".into(),
            mechanic: crate::buffs::Mechanic::SlowGame,
            duration: 210.0,
            initial: 420.0,
            affected: None,
        });
        let hud = sim.active_buffs();
        assert_eq!(hud.len(), 1);
        assert_eq!(hud[0].name, "Jogo Lento");
        assert_eq!(hud[0].ratio, 0.5);
    }
}
