/// Game tuning parameters for the soccer simulation.
///
/// Distances are in pitch units at `field_scale = 1.0`, durations tagged
/// `_FRAMES` are simulation frames (60 per second at game speed 1) and
/// durations tagged `_MS` are wall-clock milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Pitch
    pub const FIELD_WIDTH: f32 = 1000.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    pub const GOAL_HEIGHT: f32 = 180.0;
    pub const GOAL_DEPTH: f32 = 20.0;
    pub const PENALTY_AREA_DEPTH: f32 = 165.0;
    pub const PENALTY_AREA_SPAN: f32 = 403.0;

    // Bodies
    pub const PLAYER_RADIUS: f32 = 25.0;
    pub const BALL_RADIUS: f32 = 15.0;
    pub const GOALIE_SIZE: f32 = 30.0;
    pub const PLAYER_MASS: f32 = 5.0;
    pub const GOALIE_MASS_FACTOR: f32 = 1.5;
    pub const PLAYER_BOUNCINESS: f32 = 0.5;
    pub const OUTFIELD_PER_TEAM: usize = 10;
    pub const GOALIE_SPAWN_DEPTH: f32 = 2.5; // in player radii from the goal line

    // Movement
    pub const MIN_PLAYER_SPEED: f32 = 1.0;
    pub const MAX_PLAYER_SPEED: f32 = 4.0;
    pub const GOALIE_SPEED: f32 = 0.22; // fraction of max player speed
    pub const GOALIE_INTELLIGENCE: f32 = 1.0;
    pub const GOALIE_PREDICTION_FRAMES: f32 = 20.0;
    pub const GOALIE_STEER: f32 = 0.1;
    pub const BLINDED_REACTION: f32 = 0.3;
    pub const BALL_EFFECT_SPEED_CEILING: f32 = 8.0; // multiples of max player speed
    pub const CONFUSION_JITTER: f32 = 2.0;

    // Dribble assist
    pub const DRIBBLE_COOLDOWN: f32 = 15.0;
    pub const DRIBBLE_REACH: f32 = 15.0;
    pub const DRIBBLE_MIN_SPEED: f32 = 0.5;
    pub const DRIBBLE_BOOST: f32 = 1.4;

    // Tackles
    pub const TACKLE_DISTANCE: f32 = 150.0;
    pub const TACKLE_COOLDOWN: f32 = 90.0;
    pub const TACKLE_BASE_CHANCE: f32 = 0.01;
    pub const TACKLE_FORCE: f32 = 5.0;

    // Auto-shoot
    pub const SHOT_FORCE: f32 = 6.0;
    pub const SHOT_RANGE: f32 = 0.45; // fraction of pitch length
    pub const SHOT_SPREAD: f32 = 150.0;
    pub const SHOT_AIM_SPAN: f32 = 0.8; // fraction of goal height
    pub const PASS_FORCE: f32 = 4.5;
    pub const PASS_THRESHOLD: f32 = 40.0;
    pub const PASS_OPEN_BONUS: f32 = 50.0;
    pub const PASS_INTERCEPT_PENALTY: f32 = 100.0;
    pub const DRIBBLE_KICK_FORCE: f32 = 2.5;
    pub const DRIBBLE_KICK_JITTER: f32 = 0.3;
    pub const STRONG_KICK: f32 = 0.8; // fraction of max player speed

    // Comeback (trailing by two or more)
    pub const COMEBACK_DEFICIT: i32 = 2;
    pub const COMEBACK_MASS: f32 = 1.5;
    pub const COMEBACK_SIZE: f32 = 1.25;
    pub const COMEBACK_SPEED: f32 = 1.9;
    pub const COMEBACK_SHOT: f32 = 1.8;
    pub const COMEBACK_TACKLE_RANGE: f32 = 1.5;
    pub const COMEBACK_TACKLE_CHANCE: f32 = 1.8;
    pub const COMEBACK_GOALIE_INTELLIGENCE: f32 = 0.55;

    // Collisions
    pub const SAVE_BOOST: f32 = 2.5;
    pub const IMPACT_SPARK_THRESHOLD: f32 = 1.5;

    // Clock
    pub const HALF_SECONDS: u32 = 2700;
    pub const FULL_SECONDS: u32 = 5400;
    pub const FIRST_STOPPAGE: (u32, u32) = (60, 180);
    pub const SECOND_STOPPAGE: (u32, u32) = (120, 300);
    pub const MATCH_DURATION_SECS: f32 = 60.0;
    pub const SHOWCASE_MS: f32 = 5000.0;
    pub const COUNTDOWN_START: u8 = 3;
    pub const COUNTDOWN_STEP_MS: f32 = 1000.0;
    pub const HALF_TIME_MS: f32 = 5000.0;
    pub const GOAL_PAUSE_MS: f32 = 2500.0;
    pub const KICKOFF_DELAY_MS: f32 = 500.0;
    pub const TUTORIAL_PAUSE_MS: f32 = 4000.0;
    pub const MAX_FRAME_MS: f32 = 250.0; // Clamp to prevent large jumps

    // Buffs
    pub const BUFF_RADIUS: f32 = 12.0;
    pub const BUFF_SPAWN_FRAMES: f32 = 600.0;
    pub const BUFF_LIFESPAN_FRAMES: f32 = 1200.0;
    pub const BUFF_MARGIN_LENGTH: f32 = 100.0;
    pub const BUFF_MARGIN_SPAN: f32 = 50.0;
    pub const MAX_BUFFS_ON_FIELD: usize = 4;
    pub const BUFFS_PER_CATEGORY: usize = 2;
    pub const BALL_EFFECT_FRAMES: f32 = 240.0;
    pub const TRAP_FREEZE_FRAMES: f32 = 180.0;
    pub const GEL_RADIUS: f32 = 100.0;
    pub const GEL_JITTER: f32 = 0.7;
    pub const TELEPORT_DISTANCE: f32 = 150.0;
    pub const PUSH_LINE_DISTANCE: f32 = 150.0;
    pub const PURE_ENERGY_BOOST: f32 = 1.2;

    // Particles
    pub const MAX_PARTICLES: usize = 2000;
    pub const PARTICLE_GRAVITY: f32 = 0.1;
}
