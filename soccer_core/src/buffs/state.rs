use std::collections::HashSet;

use serde::Serialize;

use super::Mechanic;
use crate::{BodyId, Params, Side};

/// An applied effect, scoped to a team or to one body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBuff {
    pub id: u32,
    pub owner: Side,
    pub key: String,
    pub mechanic: Mechanic,
    /// Frames remaining
    pub duration: f32,
    pub initial: f32,
    pub affected: Option<BodyId>,
}

impl ActiveBuff {
    /// Remaining fraction, for the HUD bar
    pub fn ratio(&self) -> f32 {
        if self.initial <= 0.0 {
            return 0.0;
        }
        (self.duration / self.initial).clamp(0.0, 1.0)
    }
}

/// A charged shot currently travelling with the ball
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BallEffect {
    pub key: String,
    pub mechanic: Mechanic,
    pub owner: Side,
    pub duration: f32,
    pub initial: f32,
    /// Two-stage shots fire their second stage once
    pub boosted: bool,
}

impl BallEffect {
    pub fn new(key: String, mechanic: Mechanic, owner: Side) -> Self {
        Self {
            key,
            mechanic,
            owner,
            duration: Params::BALL_EFFECT_FRAMES,
            initial: Params::BALL_EFFECT_FRAMES,
            boosted: false,
        }
    }

    /// Elapsed fraction of the flight, 0..=1
    pub fn progress(&self) -> f32 {
        (1.0 - self.duration / self.initial).clamp(0.0, 1.0)
    }
}

/// Per-match buff bookkeeping
#[derive(Debug, Clone, Default)]
pub struct BuffState {
    /// Keys drawn for this match
    pub pool: Vec<String>,
    pub active: Vec<ActiveBuff>,
    pub ball_effect: Option<BallEffect>,
    /// Permanent buffs already picked up this match
    pub claimed: HashSet<String>,
    /// Types picked up at least once (gates the tutorial)
    pub seen: HashSet<String>,
    pub spawn_timer: f32,
    next_id: u32,
}

impl BuffState {
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }

    pub fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Whether `owner` holds a team-wide buff with this mechanic
    pub fn team_has(&self, mechanic: Mechanic, owner: Side) -> bool {
        self.active
            .iter()
            .any(|b| b.mechanic == mechanic && b.owner == owner && b.affected.is_none())
    }

    /// First body-scoped buff on `body` matching `pred`
    pub fn find_for_body(&self, body: BodyId, pred: impl Fn(Mechanic) -> bool) -> Option<&ActiveBuff> {
        self.active
            .iter()
            .find(|b| b.affected == Some(body) && pred(b.mechanic))
    }

    pub fn remove(&mut self, id: u32) -> Option<ActiveBuff> {
        let index = self.active.iter().position(|b| b.id == id)?;
        Some(self.active.remove(index))
    }

    /// Count down every active buff and the ball effect by `dt` frames
    pub fn tick(&mut self, dt: f32) {
        for buff in &mut self.active {
            buff.duration = (buff.duration - dt).max(0.0);
        }
        self.active.retain(|b| {
            if b.duration > 0.0 {
                return true;
            }
            log::debug!("buff {} expired for {:?}", b.key, b.owner);
            false
        });

        if let Some(effect) = &mut self.ball_effect {
            if effect.duration > dt {
                effect.duration -= dt;
            } else {
                self.ball_effect = None;
            }
        }
    }

    /// Kickoff after a goal: effects end, but claims and tutorial state stay
    pub fn clear_for_kickoff(&mut self) {
        self.active.clear();
        self.ball_effect = None;
        self.spawn_timer = 0.0;
    }

    pub fn reset(&mut self, pool: Vec<String>) {
        *self = Self::new(pool);
    }
}
