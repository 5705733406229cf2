use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::buffs::Mechanic;

/// One of the two teams. Side A defends the left (or top) goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Stable body identity, unchanged when bodies are recreated at kickoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyId {
    Ball,
    Goalie(Side),
    Outfield(Side, u8),
}

impl BodyId {
    pub fn side(self) -> Option<Side> {
        match self {
            BodyId::Ball => None,
            BodyId::Goalie(side) | BodyId::Outfield(side, _) => Some(side),
        }
    }
}

/// Transient per-frame status, cleared and re-applied every frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusFlags {
    pub ghost: bool,
    pub confused: bool,
    pub frozen: bool,
    pub invisible: bool,
    pub blinded: bool,
    pub repels_ball: bool,
}

/// Body component - any simulated circle (player, goalkeeper or ball)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Body {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub base_radius: f32,
    pub base_mass: f32,
    pub mass: f32,
    /// Radius multiplier from buffs, ratings and comeback (1.0 = none)
    pub size: f32,
    /// Max-speed multiplier from buffs, ratings and comeback (1.0 = none)
    pub speed_factor: f32,
    pub bounciness: f32,
    pub friction: f32,
    pub flags: StatusFlags,
}

impl Body {
    fn new(id: BodyId, pos: Vec2, vel: Vec2, radius: f32, mass: f32, bounciness: f32, friction: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            base_radius: radius,
            base_mass: mass,
            mass,
            size: 1.0,
            speed_factor: 1.0,
            bounciness,
            friction,
            flags: StatusFlags::default(),
        }
    }

    pub fn outfield(side: Side, slot: u8, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self::new(
            BodyId::Outfield(side, slot),
            pos,
            vel,
            radius,
            crate::Params::PLAYER_MASS,
            crate::Params::PLAYER_BOUNCINESS,
            0.9,
        )
    }

    pub fn goalie(side: Side, pos: Vec2, radius: f32) -> Self {
        Self::new(
            BodyId::Goalie(side),
            pos,
            Vec2::ZERO,
            radius,
            crate::Params::PLAYER_MASS * crate::Params::GOALIE_MASS_FACTOR,
            crate::Params::PLAYER_BOUNCINESS,
            0.9,
        )
    }

    pub fn ball(pos: Vec2, vel: Vec2, radius: f32, profile: crate::BallProfile) -> Self {
        Self::new(
            BodyId::Ball,
            pos,
            vel,
            radius,
            profile.mass,
            profile.bounciness,
            profile.friction,
        )
    }

    /// Effective radius after size modifiers
    pub fn radius(&self) -> f32 {
        self.base_radius * self.size
    }

    pub fn side(&self) -> Option<Side> {
        self.id.side()
    }

    pub fn is_ball(&self) -> bool {
        self.id == BodyId::Ball
    }

    pub fn is_goalie(&self) -> bool {
        matches!(self.id, BodyId::Goalie(_))
    }

    pub fn is_outfield(&self) -> bool {
        matches!(self.id, BodyId::Outfield(..))
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Clear everything buffs re-apply each frame
    pub fn reset_modifiers(&mut self) {
        self.size = 1.0;
        self.speed_factor = 1.0;
        self.mass = self.base_mass;
        self.flags = StatusFlags::default();
    }

    /// Replace non-finite state so a bad frame can't poison the body forever
    pub fn sanitize(&mut self, fallback_pos: Vec2) {
        if !self.vel.is_finite() {
            self.vel = Vec2::ZERO;
        }
        if !self.pos.is_finite() {
            self.pos = fallback_pos;
        }
    }
}

/// Per-player countdowns (frames) for the dribble nudge and tackle lunge
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooldowns {
    pub dribble: f32,
    pub tackle: f32,
}

/// Packed 0xRRGGBB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLAST: Color = Color(0xf97316);
    pub const SMOKE: Color = Color(0xd1d5db);

    /// Parse `#rrggbb` or `#rgb`
    pub fn from_hex(hex: &str) -> Option<Color> {
        let digits = hex.trim().trim_start_matches('#');
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Color),
            3 => {
                let short = u32::from_str_radix(digits, 16).ok()?;
                let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                Some(Color((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
            }
            _ => None,
        }
    }

    pub fn to_css(self) -> String {
        format!("#{:06x}", self.0)
    }
}

/// Visual particle (sparks, fireworks, explosions). Affects nothing physically.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub color: Color,
}

impl Particle {
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Planted hazard kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrapKind {
    /// Paralyzes the first opponent that steps on it
    DeadZone,
    /// Jostles the opposing goalkeeper while inside
    SlipperyGel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trap {
    pub kind: TrapKind,
    pub owner: Side,
}

/// Buff lying on the pitch: a pickup, or a planted trap when `trap` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBuff {
    pub id: u32,
    pub key: String,
    pub mechanic: Mechanic,
    pub pos: Vec2,
    pub radius: f32,
    pub trap: Option<Trap>,
}

/// Lifetime component for entities that expire (frames remaining)
#[derive(Debug, Clone, Copy)]
pub struct Lifetime {
    pub t_left: f32,
}

impl Lifetime {
    pub fn new(t_left: f32) -> Self {
        Self { t_left }
    }

    pub fn is_expired(&self) -> bool {
        self.t_left <= 0.0
    }
}
