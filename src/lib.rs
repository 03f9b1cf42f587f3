//! Math Balloon - an arithmetic arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, matching, progression)
//! - `levels`: Static level table (difficulty curve)
//! - `settings`: Host-side configuration
//! - `platform`: Browser bridge for the presentation layer

pub mod error;
pub mod levels;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, SessionError};
pub use levels::{LevelConfig, LevelTable, Operator};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Starting (and maximum) lives
    pub const MAX_LIVES: u8 = 3;
    /// Maximum digits in the input buffer
    pub const MAX_INPUT_DIGITS: usize = 3;
    /// Largest answer that fits in the input buffer
    pub const MAX_ANSWER: u32 = 999;

    /// Reference frame step: balloon speed is in units per 16ms frame
    pub const REFERENCE_FRAME_MS: f32 = 16.0;
    /// Splash screen duration before HOME
    pub const SPLASH_MS: f64 = 2500.0;
    /// Duration of slow-motion and double-score effects
    pub const EFFECT_DURATION_MS: f64 = 5000.0;
    /// Spawn interval stretch while slow-motion is active
    pub const SLOW_SPAWN_FACTOR: f64 = 1.5;
    /// Fall speed factor while slow-motion is active
    pub const SLOW_MOTION_FACTOR: f32 = 0.5;

    /// Viewport is in percent (0-100); balloons spawn above it
    pub const SPAWN_Y: f32 = -20.0;
    /// Balloons below this are gone
    pub const ESCAPE_Y: f32 = 110.0;
    /// Horizontal spawn band, clear of the edges
    pub const SPAWN_X_MIN: f32 = 10.0;
    pub const SPAWN_X_MAX: f32 = 90.0;
    /// Base fall speed range (before level multiplier)
    pub const BASE_SPEED_MIN: f32 = 0.05;
    pub const BASE_SPEED_MAX: f32 = 0.10;
    /// Entrance animation
    pub const SPAWN_SCALE: f32 = 0.1;
    pub const SCALE_STEP: f32 = 0.05;

    /// Scoring
    pub const BASE_POINTS: u64 = 10;
    pub const GOLD_BONUS: u64 = 50;

    /// Explosion particles (per pop)
    pub const EXPLOSION_PARTICLES: usize = 8;
    pub const EXPLOSION_SPEED: f32 = 0.5;
    /// Particle life lost per step (frame-based, not dt-scaled)
    pub const PARTICLE_DECAY: f32 = 0.02;

    /// Balloon palette (0xRRGGBB)
    pub const NORMAL_COLORS: [u32; 6] = [
        0xef4444, // red
        0x3b82f6, // blue
        0x22c55e, // green
        0xa855f7, // purple
        0xf97316, // orange
        0xec4899, // pink
    ];
    pub const GOLD_COLOR: u32 = 0xeab308;
    pub const BOMB_COLOR: u32 = 0x1f2937;
    pub const FREEZE_COLOR: u32 = 0x06b6d4;
    pub const STAR_COLOR: u32 = 0xf43f5e;
}

