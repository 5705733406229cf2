//! Camera for the pitch
//!
//! Maps pitch coordinates onto canvas pixels, keeping the aspect ratio and
//! leaving room for the goal nets, and carries the screen-shake offset.

use glam::Vec2;
use soccer_core::{GameRng, Pitch};

/// Shake below this many pixels is treated as settled
const SHAKE_EPSILON: f32 = 0.5;
const SHAKE_DECAY: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Canvas pixels per pitch unit
    pub zoom: f32,
    /// Canvas position of the pitch origin
    pub offset: Vec2,
    shake: f32,
    jolt: Vec2,
}

impl Camera {
    /// Fit `pitch` (plus its goal depth on every side) into a canvas
    pub fn fit(pitch: &Pitch, canvas_width: f32, canvas_height: f32) -> Self {
        let margin = pitch.goal_depth * 2.0;
        let (w, h) = (pitch.width + margin * 2.0, pitch.height + margin * 2.0);
        let zoom = (canvas_width / w).min(canvas_height / h).max(f32::EPSILON);
        let used = Vec2::new(w, h) * zoom;
        let offset = (Vec2::new(canvas_width, canvas_height) - used) * 0.5 + Vec2::splat(margin * zoom);
        Self {
            zoom,
            offset,
            shake: 0.0,
            jolt: Vec2::ZERO,
        }
    }

    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        self.offset + self.jolt + p * self.zoom
    }

    pub fn scale(&self, length: f32) -> f32 {
        length * self.zoom
    }

    /// Stronger shakes replace weaker ones; they never stack
    pub fn shake(&mut self, intensity: f32) {
        self.shake = self.shake.max(intensity);
    }

    /// Pick this frame's jolt and decay the shake
    pub fn update(&mut self, rng: &mut GameRng) {
        if self.shake < SHAKE_EPSILON {
            self.shake = 0.0;
            self.jolt = Vec2::ZERO;
            return;
        }
        self.jolt = Vec2::new(rng.jitter(self.shake), rng.jitter(self.shake));
        self.shake *= SHAKE_DECAY;
    }

    pub fn is_shaking(&self) -> bool {
        self.shake > 0.0
    }
}
