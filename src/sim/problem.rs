//! Arithmetic problem generation
//!
//! Draws a problem from a level's operator set and operand range. Results are
//! always non-negative integers so they can be typed on a digit keypad.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_ANSWER;
use crate::error::ConfigError;
use crate::levels::{LevelConfig, Operator};

/// A generated problem: `lhs op rhs = answer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub lhs: u32,
    pub op: Operator,
    pub rhs: u32,
    pub answer: u32,
}

impl Problem {
    /// Text shown on the balloon, e.g. `"7 - 3"`
    pub fn question(&self) -> String {
        format!("{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

/// Upper bound for multiplication operands so products stay small
pub fn multiplication_cap(max: u32) -> u32 {
    (2.0 * max as f64).sqrt().ceil() as u32
}

/// Generate one problem for a level
pub fn generate_problem<R: Rng + ?Sized>(
    config: &LevelConfig,
    rng: &mut R,
) -> Result<Problem, ConfigError> {
    if config.operators.is_empty() {
        return Err(ConfigError::EmptyOperators {
            level: config.level,
        });
    }
    let (min, max) = config.number_range;
    if min > max {
        return Err(ConfigError::InvalidRange {
            level: config.level,
            min,
            max,
        });
    }
    let max_answer = config.max_answer();
    if max_answer > u64::from(MAX_ANSWER) {
        return Err(ConfigError::AnswerTooLarge {
            level: config.level,
            max_answer,
        });
    }

    let op = config.operators[rng.random_range(0..config.operators.len())];
    let mut lhs = rng.random_range(min..=max);
    let mut rhs = rng.random_range(min..=max);

    let answer = match op {
        Operator::Add => lhs + rhs,
        Operator::Sub => {
            if lhs < rhs {
                std::mem::swap(&mut lhs, &mut rhs);
            }
            lhs - rhs
        }
        Operator::Mul => {
            let cap = multiplication_cap(max);
            lhs = lhs.min(cap);
            rhs = rhs.min(cap);
            lhs * rhs
        }
        Operator::Div => {
            // Only reachable when the range includes zero
            rhs = rhs.max(1);
            lhs / rhs
        }
    };

    Ok(Problem {
        lhs,
        op,
        rhs,
        answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTable;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level_with(operators: &[Operator], range: (u32, u32)) -> LevelConfig {
        let mut config = LevelTable::standard().get(1).cloned().unwrap();
        config.operators = operators.to_vec();
        config.number_range = range;
        config
    }

    #[test]
    fn test_level_one_addition() {
        let table = LevelTable::standard();
        let config = table.get(1).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..1000 {
            let p = generate_problem(config, &mut rng).unwrap();
            assert_eq!(p.op, Operator::Add);
            assert_eq!(p.answer, p.lhs + p.rhs);
            assert!((2..=10).contains(&p.answer), "answer {}", p.answer);
        }
    }

    #[test]
    fn test_question_text() {
        let p = Problem {
            lhs: 12,
            op: Operator::Mul,
            rhs: 3,
            answer: 36,
        };
        assert_eq!(p.question(), "12 * 3");
    }

    #[test]
    fn test_empty_operators_is_config_error() {
        let config = level_with(&[], (1, 5));
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            generate_problem(&config, &mut rng),
            Err(ConfigError::EmptyOperators { .. })
        ));
    }

    #[test]
    fn test_division_never_divides_by_zero() {
        let config = level_with(&[Operator::Div], (0, 3));
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..500 {
            let p = generate_problem(&config, &mut rng).unwrap();
            assert!(p.rhs >= 1);
            assert_eq!(p.answer, p.lhs / p.rhs);
        }
    }

    #[test]
    fn test_wide_range_is_rejected_not_wrapped() {
        let config = level_with(&[Operator::Add], (3_000_000_000, 4_000_000_000));
        let mut rng = Pcg32::seed_from_u64(1);
        assert!(matches!(
            generate_problem(&config, &mut rng),
            Err(ConfigError::AnswerTooLarge { level: 1, .. })
        ));
    }

    #[test]
    fn test_multiplication_cap() {
        assert_eq!(multiplication_cap(5), 4);
        assert_eq!(multiplication_cap(50), 10);
        assert_eq!(multiplication_cap(99), 15);
    }

    #[test]
    fn test_shipped_levels_stay_within_caps() {
        let table = LevelTable::standard();
        let mut rng = Pcg32::seed_from_u64(77);
        for config in table.iter() {
            let cap = multiplication_cap(config.number_range.1);
            for _ in 0..200 {
                let p = generate_problem(config, &mut rng).unwrap();
                assert!(config.operators.contains(&p.op));
                if p.op == Operator::Sub {
                    assert!(p.lhs >= p.rhs);
                }
                if p.op == Operator::Mul {
                    assert!(p.lhs <= cap && p.rhs <= cap);
                }
            }
        }
    }

    proptest! {
        #[test]
        fn prop_subtraction_is_non_negative(seed in any::<u64>(), min in 0u32..100, span in 0u32..100) {
            let config = level_with(&[Operator::Sub], (min, min + span));
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = generate_problem(&config, &mut rng).unwrap();
            prop_assert!(p.lhs >= p.rhs);
            prop_assert_eq!(p.answer, p.lhs - p.rhs);
        }

        #[test]
        fn prop_multiplication_operands_capped(seed in any::<u64>(), min in 0u32..100, span in 0u32..100) {
            let max = min + span;
            let config = level_with(&[Operator::Mul], (min, max));
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = generate_problem(&config, &mut rng).unwrap();
            let cap = multiplication_cap(max);
            prop_assert!(p.lhs <= cap && p.rhs <= cap);
            prop_assert_eq!(p.answer, p.lhs * p.rhs);
        }

        #[test]
        fn prop_addition_within_range(seed in any::<u64>(), min in 0u32..100, span in 0u32..100) {
            let max = min + span;
            let config = level_with(&[Operator::Add], (min, max));
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = generate_problem(&config, &mut rng).unwrap();
            prop_assert!(p.lhs >= min && p.lhs <= max);
            prop_assert!(p.rhs >= min && p.rhs <= max);
        }
    }
}
