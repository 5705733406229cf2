use glam::Vec2;

use crate::{Config, MatchLayout, Params, Side};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if circle intersects AABB
    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = Vec2::new(
            center.x.clamp(self.min.x, self.max.x),
            center.y.clamp(self.min.y, self.max.y),
        );
        (center - closest).length_squared() <= radius * radius
    }

    /// Clamp a circle so it lies fully inside the box
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        let lo = self.min + Vec2::splat(radius);
        let hi = self.max - Vec2::splat(radius);
        Vec2::new(
            clamp_or_mid(center.x, lo.x, hi.x),
            clamp_or_mid(center.y, lo.y, hi.y),
        )
    }
}

fn clamp_or_mid(v: f32, lo: f32, hi: f32) -> f32 {
    if lo <= hi {
        v.clamp(lo, hi)
    } else {
        (lo + hi) * 0.5
    }
}

/// Pitch geometry. "Length" runs between the goals, "span" across them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pitch {
    pub layout: MatchLayout,
    pub scale: f32,
    /// Screen-space extent
    pub width: f32,
    pub height: f32,
    pub goal_height: f32,
    pub goal_depth: f32,
    pub area_depth: f32,
    pub area_span: f32,
}

impl Pitch {
    pub fn new(config: &Config) -> Self {
        let scale = config.field_scale;
        let (length, span) = (Params::FIELD_WIDTH * scale, Params::FIELD_HEIGHT * scale);
        let (width, height) = match config.layout {
            MatchLayout::Horizontal => (length, span),
            MatchLayout::Vertical => (span, length),
        };
        Self {
            layout: config.layout,
            scale,
            width,
            height,
            goal_height: config.goal_height * scale,
            goal_depth: Params::GOAL_DEPTH * scale,
            area_depth: Params::PENALTY_AREA_DEPTH * scale,
            area_span: Params::PENALTY_AREA_SPAN * scale,
        }
    }

    pub fn length(&self) -> f32 {
        match self.layout {
            MatchLayout::Horizontal => self.width,
            MatchLayout::Vertical => self.height,
        }
    }

    pub fn span(&self) -> f32 {
        match self.layout {
            MatchLayout::Horizontal => self.height,
            MatchLayout::Vertical => self.width,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    /// Component of `v` along the goal-to-goal axis
    pub fn along(&self, v: Vec2) -> f32 {
        match self.layout {
            MatchLayout::Horizontal => v.x,
            MatchLayout::Vertical => v.y,
        }
    }

    /// Component of `v` across the pitch
    pub fn across(&self, v: Vec2) -> f32 {
        match self.layout {
            MatchLayout::Horizontal => v.y,
            MatchLayout::Vertical => v.x,
        }
    }

    /// Unit vector across the pitch
    pub fn lateral_dir(&self) -> Vec2 {
        match self.layout {
            MatchLayout::Horizontal => Vec2::Y,
            MatchLayout::Vertical => Vec2::X,
        }
    }

    /// Unit vector from `side`'s own goal toward the goal it attacks
    pub fn attack_dir(&self, side: Side) -> Vec2 {
        let axis = match self.layout {
            MatchLayout::Horizontal => Vec2::X,
            MatchLayout::Vertical => Vec2::Y,
        };
        match side {
            Side::A => axis,
            Side::B => -axis,
        }
    }

    /// Build a point from a distance along the axis and a position across it
    fn point(&self, along: f32, across: f32) -> Vec2 {
        match self.layout {
            MatchLayout::Horizontal => Vec2::new(along, across),
            MatchLayout::Vertical => Vec2::new(across, along),
        }
    }

    /// Centre of the goal `side` defends
    pub fn own_goal_center(&self, side: Side) -> Vec2 {
        match side {
            Side::A => self.point(0.0, self.span() / 2.0),
            Side::B => self.point(self.length(), self.span() / 2.0),
        }
    }

    /// Centre of the goal `side` attacks
    pub fn target_goal_center(&self, side: Side) -> Vec2 {
        self.own_goal_center(side.opponent())
    }

    /// Distance of `pos` from `side`'s own goal line
    pub fn depth_from_goal(&self, side: Side, pos: Vec2) -> f32 {
        match side {
            Side::A => self.along(pos),
            Side::B => self.length() - self.along(pos),
        }
    }

    /// Position at `depth` from `side`'s goal line and `across` over the pitch
    pub fn side_point(&self, side: Side, depth: f32, across: f32) -> Vec2 {
        match side {
            Side::A => self.point(depth, across),
            Side::B => self.point(self.length() - depth, across),
        }
    }

    /// Penalty-area rectangle in front of `side`'s own goal
    pub fn penalty_area(&self, side: Side) -> Aabb {
        let span_lo = (self.span() - self.area_span) / 2.0;
        let span_hi = (self.span() + self.area_span) / 2.0;
        let (depth_lo, depth_hi) = match side {
            Side::A => (0.0, self.area_depth),
            Side::B => (self.length() - self.area_depth, self.length()),
        };
        let a = self.point(depth_lo, span_lo);
        let b = self.point(depth_hi, span_hi);
        Aabb::new(a.min(b), a.max(b))
    }

    pub fn in_penalty_area(&self, side: Side, pos: Vec2) -> bool {
        self.penalty_area(side).contains(pos)
    }

    pub fn in_any_penalty_area(&self, pos: Vec2) -> bool {
        Side::BOTH.iter().any(|&side| self.in_penalty_area(side, pos))
    }

    /// Whether `pos` lies between the posts of a goal `goal_height` wide
    pub fn within_goal_mouth(&self, pos: Vec2, goal_height: f32) -> bool {
        (self.across(pos) - self.span() / 2.0).abs() < goal_height / 2.0
    }

    /// Keep a goalkeeper inside its penalty-area box, killing outward motion
    pub fn confine_goalie(&self, side: Side, pos: &mut Vec2, vel: &mut Vec2, radius: f32) {
        let area = self.penalty_area(side);
        let clamped = area.clamp_circle(*pos, radius);
        if clamped.x != pos.x {
            vel.x = 0.0;
        }
        if clamped.y != pos.y {
            vel.y = 0.0;
        }
        *pos = clamped;
    }
}
