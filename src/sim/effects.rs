//! Timed global modifiers
//!
//! Expiry times are on the session clock, so effects freeze with the game
//! while paused and vanish with the state on a new session.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// Halves fall speed, stretches spawn interval
    SlowMotion,
    /// Doubles base points
    DoubleScore,
}

/// Active power-up effects, as expiry times in session milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slow_motion_until: Option<f64>,
    pub double_score_until: Option<f64>,
}

impl ActiveEffects {
    fn slot(&mut self, kind: EffectKind) -> &mut Option<f64> {
        match kind {
            EffectKind::SlowMotion => &mut self.slow_motion_until,
            EffectKind::DoubleScore => &mut self.double_score_until,
        }
    }

    /// (Re-)arm an effect. An active one restarts its countdown rather than stacking.
    /// Returns true if the effect was not already active.
    pub fn activate(&mut self, kind: EffectKind, now_ms: f64, duration_ms: f64) -> bool {
        let slot = self.slot(kind);
        let started = slot.is_none();
        *slot = Some(now_ms + duration_ms);
        started
    }

    /// Clear every effect whose expiry has passed, returning the ones that ended
    pub fn expire(&mut self, now_ms: f64) -> Vec<EffectKind> {
        let mut ended = Vec::new();
        for kind in [EffectKind::SlowMotion, EffectKind::DoubleScore] {
            let slot = self.slot(kind);
            if slot.is_some_and(|until| now_ms >= until) {
                *slot = None;
                ended.push(kind);
            }
        }
        ended
    }

    pub fn is_active(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::SlowMotion => self.slow_motion_until.is_some(),
            EffectKind::DoubleScore => self.double_score_until.is_some(),
        }
    }

    pub fn slow_motion(&self) -> bool {
        self.is_active(EffectKind::SlowMotion)
    }

    pub fn double_score(&self) -> bool {
        self.is_active(EffectKind::DoubleScore)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_and_expire() {
        let mut effects = ActiveEffects::default();
        assert!(effects.activate(EffectKind::SlowMotion, 1000.0, 5000.0));
        assert!(effects.slow_motion());
        assert!(!effects.double_score());

        assert!(effects.expire(5999.0).is_empty());
        assert_eq!(effects.expire(6000.0), vec![EffectKind::SlowMotion]);
        assert!(!effects.slow_motion());
    }

    #[test]
    fn test_rearm_restarts_countdown() {
        let mut effects = ActiveEffects::default();
        effects.activate(EffectKind::DoubleScore, 0.0, 5000.0);
        assert!(!effects.activate(EffectKind::DoubleScore, 3000.0, 5000.0));
        // Not additive: 3000 + 5000, not 10000
        assert_eq!(effects.double_score_until, Some(8000.0));

        assert!(effects.expire(7000.0).is_empty());
        assert!(effects.double_score());
        assert_eq!(effects.expire(8000.0), vec![EffectKind::DoubleScore]);
    }

    #[test]
    fn test_effects_are_independent() {
        let mut effects = ActiveEffects::default();
        effects.activate(EffectKind::SlowMotion, 0.0, 5000.0);
        effects.activate(EffectKind::DoubleScore, 2000.0, 5000.0);
        assert_eq!(effects.expire(5000.0), vec![EffectKind::SlowMotion]);
        assert!(effects.double_score());
    }
}
