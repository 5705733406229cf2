use serde::{Deserialize, Serialize};

use crate::{CoreError, Params};

/// Pitch orientation on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLayout {
    /// Side A defends the left edge
    #[default]
    Horizontal,
    /// Side A defends the top edge
    Vertical,
}

/// Selectable ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallKind {
    #[default]
    Classic,
    Heavy,
    Bouncy,
    Fast,
    Curve,
}

/// Physical profile of a ball kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallProfile {
    pub mass: f32,
    pub friction: f32,
    pub bounciness: f32,
    /// Lateral drift added per frame as a fraction of forward velocity
    pub spin: f32,
}

impl BallKind {
    pub fn profile(self) -> BallProfile {
        let (mass, friction, bounciness, spin) = match self {
            BallKind::Classic => (1.0, 0.99, 0.75, 0.0),
            BallKind::Heavy => (2.5, 0.97, 0.5, 0.0),
            BallKind::Bouncy => (0.8, 0.99, 0.95, 0.0),
            BallKind::Fast => (0.9, 0.995, 0.7, 0.0),
            BallKind::Curve => (1.0, 0.98, 0.7, 0.005),
        };
        BallProfile {
            mass,
            friction,
            bounciness,
            spin,
        }
    }
}

/// Match configuration bundle supplied by the setup screen.
///
/// Every field has a default so a partial JSON object deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Real seconds a full 90 simulated minutes take at game speed 1
    pub match_duration_secs: f32,
    pub game_speed: f32,
    pub layout: MatchLayout,
    pub field_scale: f32,
    pub player_size: f32,
    pub ball_size: f32,
    pub goal_height: f32,
    pub goalie_size: f32,
    pub goalie_intelligence: f32,
    pub goalie_speed: f32,
    pub tackle_distance: f32,
    pub min_player_speed: f32,
    pub max_player_speed: f32,
    pub ball: BallKind,
    pub auto_shoot: bool,
    pub screen_shake: bool,
    pub buffs_enabled: bool,
    pub buff_spawn_frames: f32,
    pub buff_tutorial: bool,
    pub use_real_ratings: bool,
    pub classic_mode: bool,
    pub home_team_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_duration_secs: Params::MATCH_DURATION_SECS,
            game_speed: 1.0,
            layout: MatchLayout::Horizontal,
            field_scale: 1.0,
            player_size: Params::PLAYER_RADIUS,
            ball_size: Params::BALL_RADIUS,
            goal_height: Params::GOAL_HEIGHT,
            goalie_size: Params::GOALIE_SIZE,
            goalie_intelligence: Params::GOALIE_INTELLIGENCE,
            goalie_speed: Params::GOALIE_SPEED,
            tackle_distance: Params::TACKLE_DISTANCE,
            min_player_speed: Params::MIN_PLAYER_SPEED,
            max_player_speed: Params::MAX_PLAYER_SPEED,
            ball: BallKind::Classic,
            auto_shoot: true,
            screen_shake: true,
            buffs_enabled: false,
            buff_spawn_frames: Params::BUFF_SPAWN_FRAMES,
            buff_tutorial: true,
            use_real_ratings: false,
            classic_mode: false,
            home_team_id: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON bundle and clamp it to safe ranges
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamp every numeric setting into a range the simulation stays stable in
    pub fn sanitized(mut self) -> Self {
        fn clamp(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
            if value.is_finite() {
                value.clamp(min, max)
            } else {
                fallback
            }
        }
        let d = Config::default();
        self.match_duration_secs = clamp(self.match_duration_secs, 10.0, 600.0, d.match_duration_secs);
        self.game_speed = clamp(self.game_speed, 0.25, 4.0, d.game_speed);
        self.field_scale = clamp(self.field_scale, 0.5, 2.0, d.field_scale);
        self.player_size = clamp(self.player_size, 10.0, 50.0, d.player_size);
        self.ball_size = clamp(self.ball_size, 5.0, 40.0, d.ball_size);
        self.goal_height = clamp(self.goal_height, 60.0, 400.0, d.goal_height);
        self.goalie_size = clamp(self.goalie_size, 10.0, 80.0, d.goalie_size);
        self.goalie_intelligence = clamp(self.goalie_intelligence, 0.1, 5.0, d.goalie_intelligence);
        self.goalie_speed = clamp(self.goalie_speed, 0.05, 2.0, d.goalie_speed);
        self.tackle_distance = clamp(self.tackle_distance, 0.0, 400.0, d.tackle_distance);
        self.max_player_speed = clamp(self.max_player_speed, 0.5, 20.0, d.max_player_speed);
        self.min_player_speed = clamp(self.min_player_speed, 0.0, self.max_player_speed, d.min_player_speed);
        self.buff_spawn_frames = clamp(self.buff_spawn_frames, 60.0, 6000.0, d.buff_spawn_frames);
        self
    }

    pub fn ball_profile(&self) -> BallProfile {
        self.ball.profile()
    }

    pub fn match_duration_ms(&self) -> f32 {
        self.match_duration_secs * 1000.0
    }

    /// Wall-clock milliseconds per simulated second
    pub fn tick_interval_ms(&self) -> f32 {
        self.match_duration_ms() / Params::FULL_SECONDS as f32 / self.game_speed
    }

    /// Wall-clock length of the post-goal celebration
    pub fn goal_pause_ms(&self) -> f32 {
        Params::GOAL_PAUSE_MS / self.game_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tick_interval() {
        let config = Config::new();
        let expected = 60_000.0 / 5400.0;
        assert!(
            (config.tick_interval_ms() - expected).abs() < 1e-4,
            "60 real seconds should map onto 5400 simulated seconds"
        );
    }

    #[test]
    fn test_tick_interval_scales_with_game_speed() {
        let config = Config {
            game_speed: 2.0,
            ..Config::new()
        };
        let base = Config::new().tick_interval_ms();
        assert!((config.tick_interval_ms() - base / 2.0).abs() < 1e-4);
        assert!((config.goal_pause_ms() - 1250.0).abs() < 1e-4);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"gameSpeed": 2.0, "ball": "heavy"}"#)
            .expect("partial config should parse");
        assert_eq!(config.game_speed, 2.0);
        assert_eq!(config.ball, BallKind::Heavy);
        assert_eq!(config.max_player_speed, Params::MAX_PLAYER_SPEED);
        assert!(config.auto_shoot, "Omitted toggles keep their defaults");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Config::from_json("{ not json").is_err());
    }

    #[test]
    fn test_sanitized_clamps_runaway_values() {
        let config = Config {
            game_speed: 100.0,
            max_player_speed: f32::NAN,
            min_player_speed: 50.0,
            ..Config::new()
        }
        .sanitized();
        assert_eq!(config.game_speed, 4.0);
        assert_eq!(config.max_player_speed, Params::MAX_PLAYER_SPEED);
        assert!(config.min_player_speed <= config.max_player_speed);
    }

    #[test]
    fn test_ball_profiles() {
        assert_eq!(BallKind::Heavy.profile().mass, 2.5);
        assert_eq!(BallKind::Bouncy.profile().bounciness, 0.95);
        assert!(BallKind::Curve.profile().spin > 0.0);
        assert_eq!(BallKind::Classic.profile().spin, 0.0);
    }
}
