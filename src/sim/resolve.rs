//! Matching typed answers against live balloons
//!
//! Resolution is split in two: `resolve` reads the balloons and decides what a
//! value hits, `apply_outcome` writes the result into the session. Balloons
//! are only flagged as popped here; the next step removes them.

use serde::{Deserialize, Serialize};

use super::effects::EffectKind;
use super::state::{Balloon, BalloonKind, GameEvent, Particle, SessionState};
use crate::consts::*;

/// Result of matching a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Nothing has this answer; input stays as typed
    NoMatch,
    /// A bomb was answered
    Trap { id: u32 },
    /// A balloon was popped
    Hit {
        id: u32,
        kind: BalloonKind,
        points: u64,
        grants: Option<EffectKind>,
    },
}

/// Parse the input buffer; anything non-numeric is ignored
pub fn parse_input(input: &str) -> Option<u32> {
    if input.is_empty() || !input.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// Lowest on screen (largest y) unpopped balloon with this answer.
/// Ties go to the earlier spawn.
pub fn find_target(balloons: &[Balloon], value: u32) -> Option<&Balloon> {
    balloons
        .iter()
        .filter(|b| !b.popped && b.answer == value)
        .fold(None, |best: Option<&Balloon>, b| match best {
            Some(current) if current.pos.y >= b.pos.y => Some(current),
            _ => Some(b),
        })
}

/// Points for popping a non-bomb balloon
pub fn points_for(kind: BalloonKind, double_score: bool) -> u64 {
    let mut points = BASE_POINTS;
    if double_score {
        points *= 2;
    }
    if kind == BalloonKind::Gold {
        points += GOLD_BONUS;
    }
    points
}

/// Decide what `value` hits
pub fn resolve(balloons: &[Balloon], value: u32, double_score: bool) -> MatchOutcome {
    let Some(target) = find_target(balloons, value) else {
        return MatchOutcome::NoMatch;
    };
    match target.kind {
        BalloonKind::Bomb => MatchOutcome::Trap { id: target.id },
        kind => MatchOutcome::Hit {
            id: target.id,
            kind,
            points: points_for(kind, double_score),
            grants: kind.grants(),
        },
    }
}

/// Write an outcome into the session
pub fn apply_outcome(
    state: &mut SessionState,
    outcome: &MatchOutcome,
    effect_duration_ms: f64,
    particle_cap: usize,
) {
    let id = match outcome {
        MatchOutcome::NoMatch => return,
        MatchOutcome::Trap { id } | MatchOutcome::Hit { id, .. } => *id,
    };
    let Some(balloon) = state.balloons.iter_mut().find(|b| b.id == id) else {
        log::warn!("Match outcome for unknown balloon {}", id);
        return;
    };
    balloon.popped = true;
    let (pos, color) = (balloon.pos, balloon.color);

    match *outcome {
        MatchOutcome::Trap { id } => {
            log::debug!("Trap {} triggered", id);
            state.events.push(GameEvent::TrapTriggered { id });
            state.lose_life();
        }
        MatchOutcome::Hit {
            id,
            kind,
            points,
            grants,
        } => {
            log::debug!("Popped {:?} balloon {} for {} points", kind, id, points);
            state.score += points;
            state.cleared += 1;
            state.events.push(GameEvent::Popped { id, kind, points });
            if let Some(effect) = grants {
                let started = state
                    .effects
                    .activate(effect, state.clock_ms, effect_duration_ms);
                log::debug!("{:?} armed until {:.0}ms", effect, state.clock_ms + effect_duration_ms);
                state.events.push(if started {
                    GameEvent::EffectStarted(effect)
                } else {
                    GameEvent::EffectRenewed(effect)
                });
            }
        }
        MatchOutcome::NoMatch => {}
    }

    state.push_particles(Particle::explosion(pos, color), particle_cap);
    state.input.clear();
}
