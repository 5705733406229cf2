use serde::Serialize;

use crate::{BuffCatalog, Config, MatchPhase, Particle, Pitch, Side, TeamInfo, TeamModifiers};

/// Time resource for tracking simulation time, in frames
#[derive(Debug, Clone, Copy)]
pub struct Time {
    pub dt: f32,  // Frames advanced by this step (the game-speed multiplier)
    pub now: f32, // Total active frames simulated
}

impl Time {
    pub fn new(dt: f32, now: f32) -> Self {
        Self { dt, now }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self { dt: 1.0, now: 0.0 }
    }
}

/// Match score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Score {
    pub a: u32,
    pub b: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> u32 {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    pub fn increment(&mut self, side: Side) {
        match side {
            Side::A => self.a += 1,
            Side::B => self.b += 1,
        }
    }

    /// Goals for minus goals against, from `side`'s point of view
    pub fn diff(&self, side: Side) -> i32 {
        self.get(side) as i32 - self.get(side.opponent()) as i32
    }
}

/// Per-team match statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub touches: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    /// Active frames during which this team touched the ball last
    pub possession: u32,
    pub saves: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    pub a: TeamStats,
    pub b: TeamStats,
    pub last_touch: Option<Side>,
}

impl MatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, side: Side) -> &TeamStats {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut TeamStats {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    /// Frame-weighted possession share, 0..=100
    pub fn possession_percent(&self, side: Side) -> f32 {
        let total = self.a.possession + self.b.possession;
        if total == 0 {
            return 50.0;
        }
        self.get(side).possession as f32 * 100.0 / total as f32
    }

    /// Credit one possession tick to whoever touched the ball last
    pub fn tick_possession(&mut self) {
        if let Some(side) = self.last_touch {
            self.get_mut(side).possession += 1;
        }
    }
}

/// Random number generator
pub struct GameRng(pub rand::rngs::StdRng);

impl GameRng {
    pub fn new(seed: u64) -> Self {
        use rand::SeedableRng;
        Self(rand::rngs::StdRng::seed_from_u64(seed))
    }

    /// Uniform in [-0.5, 0.5) scaled by `span`
    pub fn jitter(&mut self, span: f32) -> f32 {
        use rand::Rng;
        (self.0.gen::<f32>() - 0.5) * span
    }

    pub fn chance(&mut self, p: f32) -> bool {
        use rand::Rng;
        self.0.gen::<f32>() < p
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}

/// Sound cues, keyed by the names the audio layer knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Sfx {
    BallTouch,
    Goal,
    WallHit,
    BuffPickup,
    GoalCheer,
    MatchStart,
    HalfTime,
    SecondHalfStart,
    MatchEnd,
}

impl Sfx {
    pub fn name(self) -> &'static str {
        match self {
            Sfx::BallTouch => "ballTouch",
            Sfx::Goal => "goal",
            Sfx::WallHit => "wallHit",
            Sfx::BuffPickup => "buffPickup",
            Sfx::GoalCheer => "goalCheer",
            Sfx::MatchStart => "matchStart",
            Sfx::HalfTime => "halfTime",
            Sfx::SecondHalfStart => "secondHalfStart",
            Sfx::MatchEnd => "matchEnd",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Touch,
    Shot,
    ShotOnTarget,
    Save,
}

/// Something that happened this frame, for the scoreboard, HUD and audio
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    GoalScored { side: Side },
    Stat { side: Side, kind: StatKind },
    FirstBuffPickup { key: String, side: Side },
    BuffPickedUp { key: String, side: Side },
    BuffSpawned { key: String },
    PhaseChanged { from: MatchPhase, to: MatchPhase },
    ScreenShake { intensity: f32 },
    Sfx { name: Sfx },
}

/// Events that occurred during this frame
#[derive(Debug, Clone, Default)]
pub struct Events {
    pub list: Vec<GameEvent>,
    /// Particles spawned this frame, flushed into the world at the end of the step
    pub particles: Vec<Particle>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.list.clear();
        self.particles.clear();
    }

    pub fn push(&mut self, event: GameEvent) {
        self.list.push(event);
    }

    /// Queue a sound cue, at most once per frame per cue
    pub fn sfx(&mut self, name: Sfx) {
        let cue = GameEvent::Sfx { name };
        if !self.list.contains(&cue) {
            self.list.push(cue);
        }
    }

    pub fn stat(&mut self, side: Side, kind: StatKind) {
        self.list.push(GameEvent::Stat { side, kind });
    }

    pub fn goal(&self) -> Option<Side> {
        self.list.iter().find_map(|e| match e {
            GameEvent::GoalScored { side } => Some(*side),
            _ => None,
        })
    }

    pub fn has_sfx(&self, name: Sfx) -> bool {
        self.list.contains(&GameEvent::Sfx { name })
    }
}

/// Read-only inputs shared by every sub-step of a frame
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub config: &'a Config,
    pub pitch: &'a Pitch,
    pub catalog: &'a BuffCatalog,
    pub teams: &'a [TeamInfo; 2],
    pub modifiers: &'a [TeamModifiers; 2],
    /// Side currently trailing by two or more goals
    pub comeback: Option<Side>,
    pub time: Time,
}

impl StepContext<'_> {
    pub fn mods(&self, side: Side) -> &TeamModifiers {
        &self.modifiers[side.index()]
    }

    pub fn team(&self, side: Side) -> &TeamInfo {
        &self.teams[side.index()]
    }

    pub fn in_comeback(&self, side: Side) -> bool {
        self.comeback == Some(side)
    }
}
