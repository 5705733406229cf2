//! Match Clock
//!
//! Phase state machine plus the wall-clock driver that maps real time onto
//! the simulated 90 minutes.

use rand::Rng;
use serde::Serialize;

use crate::{Config, GameRng, Params, Score, Side};

/// Match phases, in the only order they can occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchPhase {
    PreGame,
    RatingsShowcase,
    Countdown,
    FirstHalf,
    FirstHalfStoppage,
    HalfTime,
    SecondHalf,
    SecondHalfStoppage,
    FullTime,
}

impl MatchPhase {
    /// Phases during which the game timer runs and play is live
    pub fn is_timed(self) -> bool {
        matches!(
            self,
            MatchPhase::FirstHalf
                | MatchPhase::FirstHalfStoppage
                | MatchPhase::SecondHalf
                | MatchPhase::SecondHalfStoppage
        )
    }
}

/// Actions that trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    Start,
    StartWithShowcase,
    ShowcaseDone,
    CountdownDone,
    RegulationElapsed,
    StoppageElapsed,
    SecondHalfKickoff,
    FinalWhistle,
    Reset,
}

impl PhaseAction {
    pub const ALL: [PhaseAction; 9] = [
        PhaseAction::Start,
        PhaseAction::StartWithShowcase,
        PhaseAction::ShowcaseDone,
        PhaseAction::CountdownDone,
        PhaseAction::RegulationElapsed,
        PhaseAction::StoppageElapsed,
        PhaseAction::SecondHalfKickoff,
        PhaseAction::FinalWhistle,
        PhaseAction::Reset,
    ];
}

/// Transition table. Anything not listed is rejected.
pub fn next_phase(phase: MatchPhase, action: PhaseAction) -> Option<MatchPhase> {
    use MatchPhase::*;
    use PhaseAction::*;

    match (phase, action) {
        (_, Reset) => Some(PreGame),

        (PreGame, Start) => Some(Countdown),
        (PreGame, StartWithShowcase) => Some(RatingsShowcase),
        (RatingsShowcase, ShowcaseDone) => Some(Countdown),
        (Countdown, CountdownDone) => Some(FirstHalf),

        (FirstHalf, RegulationElapsed) => Some(FirstHalfStoppage),
        (FirstHalfStoppage, StoppageElapsed) => Some(HalfTime),
        (HalfTime, SecondHalfKickoff) => Some(SecondHalf),
        (SecondHalf, RegulationElapsed) => Some(SecondHalfStoppage),
        (SecondHalfStoppage, FinalWhistle) => Some(FullTime),

        _ => None,
    }
}

/// Result of a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionResult {
    pub success: bool,
    pub from: MatchPhase,
    pub to: MatchPhase,
    pub action: PhaseAction,
}

/// Final result, fixed once full time is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winner {
    Side(Side),
    Draw,
}

impl Winner {
    pub fn from_score(score: &Score) -> Winner {
        match score.a.cmp(&score.b) {
            std::cmp::Ordering::Greater => Winner::Side(Side::A),
            std::cmp::Ordering::Less => Winner::Side(Side::B),
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchClock {
    phase: MatchPhase,
    /// Simulated seconds since kickoff (0..=5400 plus stoppage)
    pub game_time: u32,
    /// Stoppage seconds allotted to the current half
    pub stoppage: u32,
    pub countdown: u8,
    pub paused: bool,
    winner: Option<Winner>,
    tick_interval_ms: f32,
    phase_timer_ms: f32,
    tick_accum_ms: f32,
    sudden_death: bool,
}

impl MatchClock {
    pub fn new(config: &Config) -> Self {
        Self {
            phase: MatchPhase::PreGame,
            game_time: 0,
            stoppage: 0,
            countdown: 0,
            paused: false,
            winner: None,
            tick_interval_ms: config.tick_interval_ms().max(f32::EPSILON),
            phase_timer_ms: 0.0,
            tick_accum_ms: 0.0,
            sudden_death: false,
        }
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    /// Clock frozen at the end of stoppage waiting for the ball to leave an area
    pub fn in_sudden_death(&self) -> bool {
        self.sudden_death
    }

    pub fn can_transition(&self, action: PhaseAction) -> bool {
        next_phase(self.phase, action).is_some()
    }

    /// Attempt a transition through the table
    pub fn transition(&mut self, action: PhaseAction) -> TransitionResult {
        let from = self.phase;
        match next_phase(from, action) {
            Some(to) => {
                self.phase = to;
                self.phase_timer_ms = 0.0;
                log::info!("phase {:?} -> {:?} ({:?}) at {}", from, to, action, self.display_time());
                TransitionResult {
                    success: true,
                    from,
                    to,
                    action,
                }
            }
            None => {
                log::warn!("rejected {:?} in phase {:?}", action, from);
                TransitionResult {
                    success: false,
                    from,
                    to: from,
                    action,
                }
            }
        }
    }

    /// Leave the pre-game screen
    pub fn start(&mut self, real_ratings: bool) -> TransitionResult {
        let action = if real_ratings {
            PhaseAction::StartWithShowcase
        } else {
            PhaseAction::Start
        };
        let result = self.transition(action);
        if result.to == MatchPhase::Countdown {
            self.countdown = Params::COUNTDOWN_START;
        }
        result
    }

    /// Back to pre-game with all timing state cleared
    pub fn reset(&mut self) {
        if self.phase != MatchPhase::PreGame {
            self.transition(PhaseAction::Reset);
        }
        self.game_time = 0;
        self.stoppage = 0;
        self.countdown = 0;
        self.paused = false;
        self.winner = None;
        self.phase_timer_ms = 0.0;
        self.tick_accum_ms = 0.0;
        self.sudden_death = false;
    }

    /// Pause only applies while the timer is running. Returns the new state.
    pub fn toggle_pause(&mut self) -> bool {
        if self.phase.is_timed() {
            self.paused = !self.paused;
            log::debug!("paused = {}", self.paused);
        }
        self.paused
    }

    /// Drive the clock by one frame of wall-clock time
    pub fn advance(
        &mut self,
        real_dt_ms: f32,
        effectively_paused: bool,
        ball_in_penalty_area: bool,
        score: &Score,
        rng: &mut GameRng,
    ) -> Vec<TransitionResult> {
        let mut transitions = Vec::new();
        if effectively_paused {
            return transitions;
        }

        match self.phase {
            MatchPhase::RatingsShowcase => {
                self.phase_timer_ms += real_dt_ms;
                if self.phase_timer_ms >= Params::SHOWCASE_MS {
                    transitions.push(self.transition(PhaseAction::ShowcaseDone));
                    self.countdown = Params::COUNTDOWN_START;
                }
            }
            MatchPhase::Countdown => {
                self.phase_timer_ms += real_dt_ms;
                while self.phase_timer_ms >= Params::COUNTDOWN_STEP_MS && self.countdown > 0 {
                    self.phase_timer_ms -= Params::COUNTDOWN_STEP_MS;
                    self.countdown -= 1;
                }
                if self.countdown == 0 {
                    transitions.push(self.transition(PhaseAction::CountdownDone));
                    self.game_time = 0;
                    self.tick_accum_ms = 0.0;
                }
            }
            MatchPhase::HalfTime => {
                self.phase_timer_ms += real_dt_ms;
                if self.phase_timer_ms >= Params::HALF_TIME_MS {
                    transitions.push(self.transition(PhaseAction::SecondHalfKickoff));
                    self.game_time = Params::HALF_SECONDS;
                    self.stoppage = 0;
                    self.tick_accum_ms = 0.0;
                }
            }
            phase if phase.is_timed() => {
                if self.sudden_death {
                    if !ball_in_penalty_area {
                        transitions.push(self.final_whistle(score));
                    }
                    return transitions;
                }
                self.tick_accum_ms += real_dt_ms;
                while self.tick_accum_ms >= self.tick_interval_ms && self.phase.is_timed() && !self.sudden_death {
                    self.tick_accum_ms -= self.tick_interval_ms;
                    if let Some(result) = self.tick(ball_in_penalty_area, score, rng) {
                        transitions.push(result);
                    }
                }
            }
            _ => {}
        }

        transitions
    }

    /// One simulated second
    fn tick(&mut self, ball_in_penalty_area: bool, score: &Score, rng: &mut GameRng) -> Option<TransitionResult> {
        match self.phase {
            MatchPhase::FirstHalf => {
                self.game_time += 1;
                if self.game_time >= Params::HALF_SECONDS {
                    let (lo, hi) = Params::FIRST_STOPPAGE;
                    self.stoppage = rng.0.gen_range(lo..hi);
                    return Some(self.transition(PhaseAction::RegulationElapsed));
                }
            }
            MatchPhase::FirstHalfStoppage => {
                self.game_time += 1;
                if self.game_time >= Params::HALF_SECONDS + self.stoppage {
                    self.tick_accum_ms = 0.0;
                    return Some(self.transition(PhaseAction::StoppageElapsed));
                }
            }
            MatchPhase::SecondHalf => {
                self.game_time += 1;
                if self.game_time >= Params::FULL_SECONDS {
                    let (lo, hi) = Params::SECOND_STOPPAGE;
                    self.stoppage = rng.0.gen_range(lo..hi);
                    return Some(self.transition(PhaseAction::RegulationElapsed));
                }
            }
            MatchPhase::SecondHalfStoppage => {
                let end = Params::FULL_SECONDS + self.stoppage;
                if self.game_time < end {
                    self.game_time += 1;
                }
                if self.game_time >= end {
                    if ball_in_penalty_area {
                        log::info!("sudden death: clock held at {}", self.display_time());
                        self.sudden_death = true;
                    } else {
                        return Some(self.final_whistle(score));
                    }
                }
            }
            _ => {}
        }
        None
    }

    fn final_whistle(&mut self, score: &Score) -> TransitionResult {
        self.sudden_death = false;
        let result = self.transition(PhaseAction::FinalWhistle);
        if result.success {
            let winner = Winner::from_score(score);
            log::info!("full time {}-{}: {:?}", score.a, score.b, winner);
            self.winner = Some(winner);
        }
        result
    }

    /// Game time as MM:SS
    pub fn display_time(&self) -> String {
        format!("{:02}:{:02}", self.game_time / 60, self.game_time % 60)
    }
}
