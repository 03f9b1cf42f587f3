//! Per-frame simulation step
//!
//! Advances the live balloons by a variable frame delta. Within one step the
//! order is fixed: spawn gate, motion, boundary removal, particle aging.

use rand::Rng;

use super::spawn::spawn_balloon;
use super::state::{GameEvent, SessionState};
use crate::consts::*;
use crate::error::ConfigError;
use crate::levels::LevelConfig;

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// ID of the balloon spawned this step
    pub spawned: Option<u32>,
    /// Balloons that fell past the bottom
    pub escaped: u32,
    /// At most one life is lost per step, however many escape
    pub life_lost: bool,
}

/// Advance the session by `dt_ms` milliseconds of game time
pub fn step<R: Rng + ?Sized>(
    state: &mut SessionState,
    config: &LevelConfig,
    dt_ms: f64,
    rng: &mut R,
) -> Result<StepReport, ConfigError> {
    let mut report = StepReport::default();
    state.clock_ms += dt_ms;
    let slow = state.effects.slow_motion();

    // Spawn gate
    let interval = if slow {
        config.spawn_interval_ms * SLOW_SPAWN_FACTOR
    } else {
        config.spawn_interval_ms
    };
    let due = state
        .last_spawn_ms
        .is_none_or(|last| state.clock_ms - last > interval);
    if due {
        let id = state.next_entity_id();
        let balloon = spawn_balloon(id, config, rng)?;
        log::debug!(
            "Spawned {:?} balloon {} '{}' = {}",
            balloon.kind,
            id,
            balloon.question,
            balloon.answer
        );
        state.events.push(GameEvent::Spawned {
            id,
            kind: balloon.kind,
        });
        state.balloons.push(balloon);
        state.last_spawn_ms = Some(state.clock_ms);
        report.spawned = Some(id);
    }

    // Motion, entrance animation, boundary
    let mut advance = dt_ms as f32 / REFERENCE_FRAME_MS;
    if slow {
        advance *= SLOW_MOTION_FACTOR;
    }
    let mut escaped = Vec::new();
    state.balloons.retain_mut(|b| {
        if b.popped {
            return false;
        }
        b.pos.y += b.speed * advance;
        b.scale = (b.scale + SCALE_STEP).min(1.0);
        if b.pos.y > ESCAPE_Y {
            escaped.push((b.id, b.kind));
            return false;
        }
        true
    });

    for (id, kind) in escaped {
        log::debug!("Balloon {} ({:?}) escaped", id, kind);
        report.escaped += 1;
        if kind.costs_life_on_escape() {
            report.life_lost = true;
        }
        state.events.push(GameEvent::Escaped { id, kind });
    }
    if report.life_lost {
        state.lose_life();
    }

    // Particles (frame-based, not dt-scaled)
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= PARTICLE_DECAY;
    }
    state.particles.retain(|p| p.life > 0.0);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelTable;
    use crate::sim::effects::EffectKind;
    use crate::sim::state::{Balloon, BalloonKind, Particle};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn balloon(state: &mut SessionState, kind: BalloonKind, y: f32, answer: u32) -> Balloon {
        Balloon {
            id: state.next_entity_id(),
            pos: Vec2::new(50.0, y),
            speed: 0.1,
            scale: 1.0,
            kind,
            question: answer.to_string(),
            answer,
            color: NORMAL_COLORS[0],
            popped: false,
        }
    }

    /// A state that won't spawn on the next small step
    fn quiet_state() -> SessionState {
        let mut state = SessionState::new();
        state.last_spawn_ms = Some(0.0);
        state
    }

    fn level_one() -> LevelConfig {
        LevelTable::standard().get(1).cloned().unwrap()
    }

    #[test]
    fn test_first_step_spawns() {
        let mut state = SessionState::new();
        let mut rng = Pcg32::seed_from_u64(5);
        let report = step(&mut state, &level_one(), 16.0, &mut rng).unwrap();
        assert!(report.spawned.is_some());
        assert_eq!(state.balloons.len(), 1);
        // The new balloon moved in the same step
        assert!(state.balloons[0].pos.y > SPAWN_Y);
        assert!((state.balloons[0].scale - (SPAWN_SCALE + SCALE_STEP)).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_cadence() {
        let config = level_one();
        let mut state = SessionState::new();
        let mut rng = Pcg32::seed_from_u64(5);
        step(&mut state, &config, 16.0, &mut rng).unwrap();

        // 2500ms interval: exactly equal is not enough
        let report = step(&mut state, &config, 2500.0, &mut rng).unwrap();
        assert!(report.spawned.is_none());
        let report = step(&mut state, &config, 1.0, &mut rng).unwrap();
        assert!(report.spawned.is_some());
    }

    #[test]
    fn test_slow_motion_stretches_spawn_interval() {
        let config = level_one();
        let mut state = quiet_state();
        state
            .effects
            .activate(EffectKind::SlowMotion, 0.0, 100_000.0);
        let mut rng = Pcg32::seed_from_u64(5);
        let report = step(&mut state, &config, 3000.0, &mut rng).unwrap();
        assert!(report.spawned.is_none());
        let report = step(&mut state, &config, 751.0, &mut rng).unwrap();
        assert!(report.spawned.is_some());
    }

    #[test]
    fn test_motion_scales_with_dt_and_slow_motion() {
        let config = level_one();
        let mut rng = Pcg32::seed_from_u64(5);

        let mut state = quiet_state();
        let b = balloon(&mut state, BalloonKind::Normal, 0.0, 4);
        state.balloons.push(b);
        step(&mut state, &config, 32.0, &mut rng).unwrap();
        assert!((state.balloons[0].pos.y - 0.2).abs() < 1e-5);

        state
            .effects
            .activate(EffectKind::SlowMotion, state.clock_ms, 5000.0);
        step(&mut state, &config, 32.0, &mut rng).unwrap();
        assert!((state.balloons[0].pos.y - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_scale_grows_per_step_and_caps() {
        let config = level_one();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state();
        let mut b = balloon(&mut state, BalloonKind::Normal, 0.0, 4);
        b.scale = SPAWN_SCALE;
        state.balloons.push(b);
        // Independent of dt
        step(&mut state, &config, 0.0, &mut rng).unwrap();
        assert!((state.balloons[0].scale - 0.15).abs() < 1e-6);
        for _ in 0..40 {
            step(&mut state, &config, 0.0, &mut rng).unwrap();
        }
        assert_eq!(state.balloons[0].scale, 1.0);
    }

    #[test]
    fn test_popped_balloons_are_dropped() {
        let config = level_one();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state();
        let mut b = balloon(&mut state, BalloonKind::Normal, 10.0, 4);
        b.popped = true;
        state.balloons.push(b);
        step(&mut state, &config, 16.0, &mut rng).unwrap();
        assert!(state.balloons.is_empty());
        assert_eq!(state.lives, MAX_LIVES);
    }

    #[test]
    fn test_escape_is_removed_once() {
        let config = level_one();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state();
        let b = balloon(&mut state, BalloonKind::Normal, 109.95, 4);
        let id = b.id;
        state.balloons.push(b);

        let report = step(&mut state, &config, 16.0, &mut rng).unwrap();
        assert_eq!(report.escaped, 1);
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert!(state.balloons.iter().all(|b| b.id != id));

        let report = step(&mut state, &config, 16.0, &mut rng).unwrap();
        assert_eq!(report.escaped, 0);
        assert_eq!(state.lives, MAX_LIVES - 1);
    }

    #[test]
    fn test_simultaneous_escapes_cost_one_life() {
        let config = level_one();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state();
        for _ in 0..3 {
            let b = balloon(&mut state, BalloonKind::Normal, 110.0, 4);
            state.balloons.push(b);
        }
        let report = step(&mut state, &config, 16.0, &mut rng).unwrap();
        assert_eq!(report.escaped, 3);
        assert!(report.life_lost);
        assert_eq!(state.lives, MAX_LIVES - 1);
    }

    #[test]
    fn test_escaping_bomb_is_free() {
        let config = level_one();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state();
        let b = balloon(&mut state, BalloonKind::Bomb, 110.0, 4);
        state.balloons.push(b);
        let report = step(&mut state, &config, 16.0, &mut rng).unwrap();
        assert_eq!(report.escaped, 1);
        assert!(!report.life_lost);
        assert_eq!(state.lives, MAX_LIVES);
        assert!(state.balloons.is_empty());
    }

    #[test]
    fn test_particles_age_and_prune() {
        let config = level_one();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state();
        state.push_particles(Particle::explosion(Vec2::new(50.0, 50.0), 0), 100);
        step(&mut state, &config, 16.0, &mut rng).unwrap();
        assert!((state.particles[0].life - 0.98).abs() < 1e-6);
        assert!((state.particles[0].pos.x - 50.5).abs() < 1e-5);
        for _ in 0..60 {
            step(&mut state, &config, 0.0, &mut rng).unwrap();
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let config = LevelTable::standard().get(16).cloned().unwrap();
        let mut a = SessionState::new();
        let mut b = SessionState::new();
        let mut rng_a = Pcg32::seed_from_u64(99999);
        let mut rng_b = Pcg32::seed_from_u64(99999);
        for i in 0..500 {
            let dt = 10.0 + (i % 7) as f64;
            step(&mut a, &config, dt, &mut rng_a).unwrap();
            step(&mut b, &config, dt, &mut rng_b).unwrap();
        }
        assert_eq!(a.balloons, b.balloons);
        assert_eq!(a.lives, b.lives);
    }
}
