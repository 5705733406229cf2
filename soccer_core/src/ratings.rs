//! Ratings-derived modifiers and the comeback rubber band.

use crate::{Config, Params, Ratings, Score, Side, TeamInfo};

/// Multipliers derived from a team's ratings (all 1.0 when ratings mode is off)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamModifiers {
    pub size: f32,
    pub speed: f32,
    pub kick_power: f32,
    pub goalie_reaction: f32,
    pub strength: f32,
    pub tackle_chance: f32,
    pub tackle_force: f32,
    pub tackle_range: f32,
    pub midfield: f32,
    pub dribble_control: f32,
}

impl Default for TeamModifiers {
    fn default() -> Self {
        Self {
            size: 1.0,
            speed: 1.0,
            kick_power: 1.0,
            goalie_reaction: 1.0,
            strength: 1.0,
            tackle_chance: 1.0,
            tackle_force: 1.0,
            tackle_range: 1.0,
            midfield: 1.0,
            dribble_control: 1.0,
        }
    }
}

impl TeamModifiers {
    pub fn from_ratings(r: &Ratings) -> Self {
        let avg = (r.attack + r.defense + r.midfield) / 3.0;
        Self {
            size: 1.0 + ((avg - 80.0) / 20.0) * 0.1,
            speed: 1.0 + ((r.midfield + r.form) / 2.0 - 75.0) * 0.03,
            kick_power: 1.0 + ((r.attack + r.form) / 2.0 - 75.0) * 0.055,
            goalie_reaction: 1.0 + ((r.defense + r.form) / 2.0 - 75.0) * 0.035,
            strength: 1.0 + ((r.defense + r.midfield) / 2.0 - 75.0) * 0.05,
            tackle_chance: 1.0 + (r.defense - 75.0) * 0.05,
            tackle_force: 1.0 + (r.defense - 75.0) * 0.03,
            tackle_range: 1.0 + (r.defense - 75.0) * 0.04,
            midfield: 1.0 + (r.midfield - 75.0) * 0.02,
            dribble_control: 1.0 + (r.midfield - 75.0) * 0.025,
        }
    }
}

/// Apply momentum and home advantage, capped at 100
pub fn effective_ratings(base: &Ratings, is_home: bool) -> Ratings {
    let momentum = 1.0 + (base.momentum - 75.0) / 25.0 * 0.08;
    let home = if is_home { 1.05 } else { 1.0 };
    let adjust = |value: f32| (value * home * momentum).min(100.0);
    Ratings {
        attack: adjust(base.attack),
        defense: adjust(base.defense),
        midfield: adjust(base.midfield),
        form: adjust(base.form),
        momentum: base.momentum,
    }
}

/// Classic mode: pull both teams halfway toward their average
pub fn balance(a: &mut Ratings, b: &mut Ratings) {
    fn pull(x: &mut f32, y: &mut f32) {
        let avg = (*x + *y) / 2.0;
        *x -= (*x - avg) * 0.5;
        *y -= (*y - avg) * 0.5;
    }
    pull(&mut a.attack, &mut b.attack);
    pull(&mut a.defense, &mut b.defense);
    pull(&mut a.midfield, &mut b.midfield);
    pull(&mut a.form, &mut b.form);
}

/// Modifiers for both sides, indexed by `Side::index`
pub fn team_modifiers(config: &Config, teams: &[TeamInfo; 2]) -> [TeamModifiers; 2] {
    if !config.use_real_ratings {
        return [TeamModifiers::default(); 2];
    }

    let is_home = |team: &TeamInfo| config.home_team_id.as_deref() == Some(team.id.as_str());
    let mut a = effective_ratings(&teams[0].ratings, is_home(&teams[0]));
    let mut b = effective_ratings(&teams[1].ratings, is_home(&teams[1]));
    if config.classic_mode {
        balance(&mut a, &mut b);
    }

    [TeamModifiers::from_ratings(&a), TeamModifiers::from_ratings(&b)]
}

/// The side trailing by at least two goals, if any
pub fn comeback_side(score: &Score) -> Option<Side> {
    Side::BOTH
        .into_iter()
        .find(|&side| score.diff(side) <= -Params::COMEBACK_DEFICIT)
}
