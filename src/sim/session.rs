//! Session and progression state machine
//!
//! `Session` is what a presentation layer talks to. It owns the session
//! state, the RNG and the frame clock, forwards keypad input to the resolver,
//! and drives phase transitions:
//!
//! ```text
//! Splash -> Home -> LevelSelect -> Game <-> Pause
//! Game -> LevelComplete | GameOver | Victory
//! LevelComplete -> Game (next) | Victory
//! GameOver -> Game (retry) | Home
//! Victory -> Home
//! ```
//!
//! The host calls [`Session::update`] once per rendered frame with a
//! monotonic timestamp and reads [`Session::snapshot`] to draw.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::effects::EffectKind;
use super::resolve::{MatchOutcome, apply_outcome, parse_input, resolve};
use super::state::{Balloon, GameEvent, GamePhase, Particle, SessionState};
use super::tick::{StepReport, step};
use crate::consts::*;
use crate::error::{ConfigError, SessionError};
use crate::levels::{LevelConfig, LevelTable};
use crate::settings::Settings;

/// Read-only view handed to the renderer each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub is_boss: bool,
    pub unlocked_level: u32,
    pub score: u64,
    pub lives: u8,
    pub max_lives: u8,
    pub cleared: u32,
    pub target: u32,
    /// cleared / target, 0-1
    pub progress: f32,
    pub input: String,
    pub slow_motion: bool,
    pub double_score: bool,
    pub balloons: Vec<Balloon>,
    pub particles: Vec<Particle>,
}

pub struct Session {
    levels: LevelTable,
    settings: Settings,
    rng: Pcg32,
    state: SessionState,
    /// Host timestamp of the previous frame; cleared on start and resume
    last_frame_ms: Option<f64>,
    splash_started_ms: Option<f64>,
}

impl Session {
    /// Create a session on the splash screen
    pub fn new(levels: LevelTable, settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        levels.validate()?;
        log::info!("Session created (seed {}, {} levels)", seed, levels.len());
        Ok(Self {
            levels,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            state: SessionState::new(),
            last_frame_ms: None,
            splash_started_ms: None,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn levels(&self) -> &LevelTable {
        &self.levels
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Config of the level being played
    pub fn level_config(&self) -> Option<&LevelConfig> {
        self.levels.get(self.state.level)
    }

    /// Advance by one host frame.
    ///
    /// Only `Splash` and `Game` react to time. In `Game` the elapsed time since
    /// the previous frame is stepped; the first frame after start or resume
    /// only sets the baseline.
    pub fn update(&mut self, now_ms: f64) -> Result<Option<StepReport>, ConfigError> {
        match self.state.phase {
            GamePhase::Splash => {
                let started = *self.splash_started_ms.get_or_insert(now_ms);
                if now_ms - started >= self.settings.splash_ms {
                    self.state.set_phase(GamePhase::Home);
                    log::info!("Splash finished");
                }
                Ok(None)
            }
            GamePhase::Game => {
                let dt = self
                    .last_frame_ms
                    .map(|last| (now_ms - last).max(0.0))
                    .unwrap_or(0.0);
                self.last_frame_ms = Some(now_ms);

                let Some(config) = self.levels.get(self.state.level) else {
                    return Err(ConfigError::MissingLevel(self.state.level));
                };
                let report = step(&mut self.state, config, dt, &mut self.rng)?;
                self.expire_effects();
                self.check_progress();
                Ok(Some(report))
            }
            _ => Ok(None),
        }
    }

    fn expire_effects(&mut self) {
        for effect in self.state.effects.expire(self.state.clock_ms) {
            log::debug!("{:?} ended", effect);
            self.state.events.push(GameEvent::EffectEnded(effect));
        }
    }

    /// Lives and level target are checked after every step and every match
    fn check_progress(&mut self) {
        if self.state.phase != GamePhase::Game {
            return;
        }
        let level = self.state.level;
        if self.state.lives == 0 {
            log::info!("Game over on level {} (score {})", level, self.state.score);
            self.stop(GamePhase::GameOver);
            return;
        }
        let target = self.level_config().map(|c| c.max_balloons).unwrap_or(u32::MAX);
        if self.state.cleared >= target {
            if level >= self.levels.final_level() {
                log::info!("Victory! Final score {}", self.state.score);
                self.stop(GamePhase::Victory);
            } else {
                if level >= self.state.unlocked_level {
                    self.state.unlocked_level = level + 1;
                    log::info!("Unlocked level {}", level + 1);
                }
                log::info!("Level {} complete (score {})", level, self.state.score);
                self.stop(GamePhase::LevelComplete);
            }
        }
    }

    /// Leave `Game`; no further steps run until a new start or resume
    fn stop(&mut self, phase: GamePhase) {
        self.last_frame_ms = None;
        self.state.set_phase(phase);
    }

    fn reject(&self, action: &'static str) -> SessionError {
        log::warn!("Rejected '{}' in {:?}", action, self.state.phase);
        SessionError::InvalidTransition {
            phase: self.state.phase,
            action,
        }
    }

    // === Transitions ===

    pub fn open_level_select(&mut self) -> Result<(), SessionError> {
        if self.state.phase != GamePhase::Home {
            return Err(self.reject("open level select"));
        }
        self.state.set_phase(GamePhase::LevelSelect);
        Ok(())
    }

    /// Start `level` from the level picker
    pub fn start_session(&mut self, level: u32) -> Result<(), SessionError> {
        if self.state.phase != GamePhase::LevelSelect {
            return Err(self.reject("start a level"));
        }
        if self.levels.get(level).is_none() {
            return Err(SessionError::UnknownLevel(level));
        }
        if level > self.state.unlocked_level {
            return Err(SessionError::LevelLocked {
                level,
                unlocked: self.state.unlocked_level,
            });
        }

        self.enter_level(level);
        Ok(())
    }

    /// Reset score, lives, balloons, particles, input and effects, then play `level`
    fn enter_level(&mut self, level: u32) {
        self.state.reset_for_level(level);
        self.last_frame_ms = None;
        self.state.set_phase(GamePhase::Game);
        log::info!("Starting level {}", level);
    }

    /// Play the same level again after losing
    pub fn retry(&mut self) -> Result<(), SessionError> {
        if self.state.phase != GamePhase::GameOver {
            return Err(self.reject("retry"));
        }
        self.enter_level(self.state.level);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), SessionError> {
        if self.state.phase != GamePhase::Game {
            return Err(self.reject("pause"));
        }
        self.stop(GamePhase::Pause);
        log::info!("Paused");
        Ok(())
    }

    /// Resume play; the frame clock restarts, so paused time is never stepped
    pub fn resume(&mut self) -> Result<(), SessionError> {
        if self.state.phase != GamePhase::Pause {
            return Err(self.reject("resume"));
        }
        self.last_frame_ms = None;
        self.state.set_phase(GamePhase::Game);
        log::info!("Resumed");
        Ok(())
    }

    pub fn advance_to_next_level(&mut self) -> Result<(), SessionError> {
        if self.state.phase != GamePhase::LevelComplete {
            return Err(self.reject("advance to the next level"));
        }
        let next = self.state.level + 1;
        if next > self.levels.final_level() {
            self.state.set_phase(GamePhase::Victory);
            return Ok(());
        }
        self.enter_level(next);
        Ok(())
    }

    pub fn return_to_menu(&mut self) -> Result<(), SessionError> {
        if !matches!(
            self.state.phase,
            GamePhase::LevelSelect | GamePhase::Pause | GamePhase::GameOver | GamePhase::Victory
        ) {
            return Err(self.reject("return to the menu"));
        }
        self.stop(GamePhase::Home);
        Ok(())
    }

    // === Keypad ===
    //
    // Every change to the buffer is matched immediately. A value that matches
    // nothing is simply left in the buffer; there is no wrong-answer penalty.

    /// Append a digit (0-9). Ignored outside `Game` or when the buffer is full.
    pub fn submit_digit(&mut self, digit: u8) -> MatchOutcome {
        if self.state.phase != GamePhase::Game
            || digit > 9
            || self.state.input.len() >= MAX_INPUT_DIGITS
        {
            return MatchOutcome::NoMatch;
        }
        self.state.input.push(char::from(b'0' + digit));
        self.match_input()
    }

    /// Drop the last digit
    pub fn backspace(&mut self) -> MatchOutcome {
        if self.state.phase != GamePhase::Game || self.state.input.pop().is_none() {
            return MatchOutcome::NoMatch;
        }
        self.match_input()
    }

    pub fn clear_input(&mut self) {
        if self.state.phase == GamePhase::Game {
            self.state.input.clear();
        }
    }

    fn match_input(&mut self) -> MatchOutcome {
        let Some(value) = parse_input(&self.state.input) else {
            return MatchOutcome::NoMatch;
        };
        let outcome = resolve(
            &self.state.balloons,
            value,
            self.state.effects.double_score(),
        );
        apply_outcome(
            &mut self.state,
            &outcome,
            self.settings.effect_duration_ms,
            self.settings.max_particles(),
        );
        self.check_progress();
        outcome
    }

    // === Read side ===

    pub fn is_effect_active(&self, kind: EffectKind) -> bool {
        self.state.effects.is_active(kind)
    }

    /// Take pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let config = self.level_config();
        let target = config.map(|c| c.max_balloons).unwrap_or(0);
        let progress = if target > 0 {
            (self.state.cleared as f32 / target as f32).min(1.0)
        } else {
            0.0
        };
        Snapshot {
            phase: self.state.phase,
            level: self.state.level,
            is_boss: config.is_some_and(|c| c.is_boss),
            unlocked_level: self.state.unlocked_level,
            score: self.state.score,
            lives: self.state.lives,
            max_lives: MAX_LIVES,
            cleared: self.state.cleared,
            target,
            progress,
            input: self.state.input.clone(),
            slow_motion: self.state.effects.slow_motion(),
            double_score: self.state.effects.double_score(),
            balloons: self.state.matchable().cloned().collect(),
            particles: self.state.particles.clone(),
        }
    }
}
