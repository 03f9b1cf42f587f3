//! Error taxonomy
//!
//! Configuration problems are fatal at startup. Session errors are rejected
//! transitions that leave state untouched. Input mistakes are never errors.

use thiserror::Error;

use crate::sim::GamePhase;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("level {level} has no operators")]
    EmptyOperators { level: u32 },
    #[error("level {level} has an inverted number range [{min}, {max}]")]
    InvalidRange { level: u32, min: u32, max: u32 },
    #[error("level {level} has a non-positive spawn interval")]
    InvalidSpawnInterval { level: u32 },
    #[error("level {level} has a non-positive speed multiplier")]
    InvalidSpeed { level: u32 },
    #[error("level {level} requires zero balloons to clear")]
    InvalidTarget { level: u32 },
    #[error("level {level} special chance {chance} is outside [0, 1]")]
    InvalidSpecialChance { level: u32, chance: f32 },
    #[error("level {level} can produce answers up to {max_answer}, more than the keypad can type")]
    AnswerTooLarge { level: u32, max_answer: u64 },
    #[error("level numbered {found} where {expected} was expected")]
    LevelNumbering { expected: u32, found: u32 },
    #[error("the level table is empty")]
    EmptyTable,
    #[error("no configuration for level {0}")]
    MissingLevel(u32),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("there is no level {0}")]
    UnknownLevel(u32),
    #[error("level {level} is locked (unlocked through {unlocked})")]
    LevelLocked { level: u32, unlocked: u32 },
    #[error("cannot {action} while in {phase:?}")]
    InvalidTransition {
        phase: GamePhase,
        action: &'static str,
    },
}
