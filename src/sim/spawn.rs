//! Balloon factory
//!
//! Builds one fully initialized balloon for a level: problem, category,
//! position, speed and color.

use glam::Vec2;
use rand::Rng;

use super::problem::generate_problem;
use super::state::{Balloon, BalloonKind};
use crate::consts::*;
use crate::error::ConfigError;
use crate::levels::LevelConfig;

/// Map a uniform roll in [0, 1) to a category.
///
/// Rolls at or above `special_chance` are normal; the rest is split into four
/// equal quartiles for gold, bomb, freeze and star.
pub fn pick_kind(special_chance: f32, roll: f32) -> BalloonKind {
    if roll >= special_chance {
        return BalloonKind::Normal;
    }
    let quartile = ((roll / special_chance) * 4.0) as usize;
    BalloonKind::SPECIALS[quartile.min(3)]
}

/// Fixed palette for specials, random pick for normal balloons
pub fn balloon_color<R: Rng + ?Sized>(kind: BalloonKind, rng: &mut R) -> u32 {
    match kind {
        BalloonKind::Gold => GOLD_COLOR,
        BalloonKind::Bomb => BOMB_COLOR,
        BalloonKind::Freeze => FREEZE_COLOR,
        BalloonKind::Star => STAR_COLOR,
        BalloonKind::Normal => NORMAL_COLORS[rng.random_range(0..NORMAL_COLORS.len())],
    }
}

/// Create a balloon just above the visible area
pub fn spawn_balloon<R: Rng + ?Sized>(
    id: u32,
    config: &LevelConfig,
    rng: &mut R,
) -> Result<Balloon, ConfigError> {
    let mut problem = generate_problem(config, rng)?;
    let kind = pick_kind(config.special_chance, rng.random::<f32>());
    let x = rng.random_range(SPAWN_X_MIN..=SPAWN_X_MAX);
    let speed = rng.random_range(BASE_SPEED_MIN..BASE_SPEED_MAX) * config.speed_multiplier;
    let color = balloon_color(kind, rng);

    // Bombs get a second, independent draw
    if kind == BalloonKind::Bomb {
        problem = generate_problem(config, rng)?;
    }

    Ok(Balloon {
        id,
        pos: Vec2::new(x, SPAWN_Y),
        speed,
        scale: SPAWN_SCALE,
        kind,
        question: problem.question(),
        answer: problem.answer,
        color,
        popped: false,
    })
}
