//! Level table - the difficulty curve as static data
//!
//! Twenty levels ship with the game. A custom table can be loaded from JSON,
//! but it is validated once at startup and treated as immutable afterwards.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_ANSWER;
use crate::error::ConfigError;
use crate::sim::problem::multiplication_cap;

/// Arithmetic operator a level may draw problems from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Sub,
    #[serde(rename = "*")]
    Mul,
    /// Not used by any shipped level
    #[serde(rename = "/")]
    Div,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }
}

/// Static configuration for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// 1-based level number
    pub level: u32,
    pub operators: Vec<Operator>,
    /// Inclusive operand range `[min, max]`
    pub number_range: (u32, u32),
    /// Milliseconds between spawns
    pub spawn_interval_ms: f64,
    /// Scales the base fall speed
    pub speed_multiplier: f32,
    /// Balloons to clear to finish the level
    pub max_balloons: u32,
    /// Probability (0-1) that a spawn is a special balloon
    pub special_chance: f32,
    #[serde(default)]
    pub is_boss: bool,
}

impl LevelConfig {
    fn new(
        level: u32,
        operators: &[Operator],
        number_range: (u32, u32),
        spawn_interval_ms: f64,
        speed_multiplier: f32,
        max_balloons: u32,
        special_chance: f32,
    ) -> Self {
        Self {
            level,
            operators: operators.to_vec(),
            number_range,
            spawn_interval_ms,
            speed_multiplier,
            max_balloons,
            special_chance,
            is_boss: false,
        }
    }

    /// Largest answer any of the level's operators can produce
    pub fn max_answer(&self) -> u64 {
        let max = u64::from(self.number_range.1);
        self.operators
            .iter()
            .map(|op| match op {
                Operator::Add => 2 * max,
                Operator::Sub | Operator::Div => max,
                Operator::Mul => {
                    let operand = max.min(u64::from(multiplication_cap(self.number_range.1)));
                    operand * operand
                }
            })
            .max()
            .unwrap_or(0)
    }

    /// Check a single level's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.level;
        if self.operators.is_empty() {
            return Err(ConfigError::EmptyOperators { level });
        }
        let (min, max) = self.number_range;
        if min > max {
            return Err(ConfigError::InvalidRange { level, min, max });
        }
        let max_answer = self.max_answer();
        if max_answer > u64::from(MAX_ANSWER) {
            return Err(ConfigError::AnswerTooLarge { level, max_answer });
        }
        if !(self.spawn_interval_ms > 0.0) {
            return Err(ConfigError::InvalidSpawnInterval { level });
        }
        if !(self.speed_multiplier > 0.0) {
            return Err(ConfigError::InvalidSpeed { level });
        }
        if self.max_balloons == 0 {
            return Err(ConfigError::InvalidTarget { level });
        }
        if !(0.0..=1.0).contains(&self.special_chance) {
            return Err(ConfigError::InvalidSpecialChance {
                level,
                chance: self.special_chance,
            });
        }
        Ok(())
    }
}

/// Ordered, validated list of levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl LevelTable {
    /// The shipped twenty-level curve
    pub fn standard() -> Self {
        use Operator::*;
        let mixed = [Add, Sub, Mul];

        let mut levels = vec![
            // 1-3: small additions
            LevelConfig::new(1, &[Add], (1, 5), 2500.0, 0.3, 10, 0.0),
            LevelConfig::new(2, &[Add], (1, 9), 2300.0, 0.35, 15, 0.1),
            LevelConfig::new(3, &[Add], (2, 10), 2100.0, 0.4, 20, 0.1),
            // 4-6: additions to 20
            LevelConfig::new(4, &[Add], (5, 15), 2000.0, 0.45, 20, 0.15),
            LevelConfig::new(5, &[Add], (5, 20), 1900.0, 0.5, 25, 0.15),
            LevelConfig::new(6, &[Add], (10, 20), 1800.0, 0.55, 25, 0.2),
            // 7-9: subtraction
            LevelConfig::new(7, &[Sub], (5, 15), 2000.0, 0.5, 20, 0.2),
            LevelConfig::new(8, &[Sub], (10, 20), 1900.0, 0.55, 25, 0.2),
            LevelConfig::new(9, &[Sub], (10, 30), 1800.0, 0.6, 30, 0.25),
            // 10-12: add + sub
            LevelConfig::new(10, &[Add, Sub], (5, 25), 1700.0, 0.65, 30, 0.25),
            LevelConfig::new(11, &[Add, Sub], (10, 40), 1600.0, 0.7, 35, 0.25),
            LevelConfig::new(12, &[Add, Sub], (10, 50), 1500.0, 0.75, 40, 0.3),
            // 13-15: multiplication
            LevelConfig::new(13, &[Mul], (2, 5), 2200.0, 0.6, 20, 0.2),
            LevelConfig::new(14, &[Mul], (2, 9), 2000.0, 0.7, 25, 0.25),
            LevelConfig::new(15, &[Mul], (3, 10), 1800.0, 0.8, 30, 0.3),
            // 16-18: mixed
            LevelConfig::new(16, &mixed, (5, 20), 1400.0, 0.9, 40, 0.3),
            LevelConfig::new(17, &mixed, (5, 30), 1300.0, 1.0, 45, 0.3),
            LevelConfig::new(18, &mixed, (5, 50), 1200.0, 1.1, 50, 0.35),
            // 19: hard
            LevelConfig::new(19, &mixed, (10, 99), 1000.0, 1.2, 60, 0.4),
            // 20: boss
            LevelConfig::new(20, &mixed, (10, 50), 800.0, 1.3, 100, 0.5),
        ];
        if let Some(boss) = levels.last_mut() {
            boss.is_boss = true;
        }

        Self { levels }
    }

    /// Build a table from levels, validating it
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        let table = Self { levels };
        table.validate()?;
        Ok(table)
    }

    /// Parse and validate a JSON level table
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        let table = Self::new(levels)?;
        log::info!("Loaded custom level table ({} levels)", table.len());
        Ok(table)
    }

    /// Levels must be non-empty, individually valid, and numbered 1..=N
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        for (i, config) in self.levels.iter().enumerate() {
            let expected = i as u32 + 1;
            if config.level != expected {
                return Err(ConfigError::LevelNumbering {
                    expected,
                    found: config.level,
                });
            }
            config.validate()?;
        }
        Ok(())
    }

    /// Look up a level by its 1-based number
    pub fn get(&self, level: u32) -> Option<&LevelConfig> {
        let index = level.checked_sub(1)?;
        self.levels.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Number of the last level (completing it wins the game)
    pub fn final_level(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelConfig> {
        self.levels.iter()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::standard()
    }
}
