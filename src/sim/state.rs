//! Game state and core simulation types
//!
//! `SessionState` is the single owner of everything that changes during play.
//! Other components read it or hand back deltas.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{ActiveEffects, EffectKind};
use crate::consts::*;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title card, leaves on its own after a fixed delay
    Splash,
    Home,
    LevelSelect,
    /// Active gameplay
    Game,
    /// Game is paused, simulation frozen
    Pause,
    LevelComplete,
    /// Lives ran out
    GameOver,
    /// Final level cleared
    Victory,
}

/// Balloon categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BalloonKind {
    #[default]
    Normal,
    /// Bonus points
    Gold,
    /// Trap: answering it costs a life, letting it fall is safe
    Bomb,
    /// Slow motion
    Freeze,
    /// Double score
    Star,
}

impl BalloonKind {
    /// Special kinds in the order their probability quartiles are assigned
    pub const SPECIALS: [BalloonKind; 4] = [
        BalloonKind::Gold,
        BalloonKind::Bomb,
        BalloonKind::Freeze,
        BalloonKind::Star,
    ];

    /// Effect granted when this kind is popped
    pub fn grants(&self) -> Option<EffectKind> {
        match self {
            BalloonKind::Star => Some(EffectKind::DoubleScore),
            BalloonKind::Freeze => Some(EffectKind::SlowMotion),
            _ => None,
        }
    }

    /// Whether escaping past the bottom costs a life
    pub fn costs_life_on_escape(&self) -> bool {
        *self != BalloonKind::Bomb
    }
}

/// A falling balloon carrying a problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balloon {
    pub id: u32,
    /// Position in viewport percent, y grows downward
    pub pos: Vec2,
    /// Fall speed in units per reference frame
    pub speed: f32,
    /// Entrance animation, 0.1 -> 1.0
    pub scale: f32,
    pub kind: BalloonKind,
    pub question: String,
    pub answer: u32,
    /// Packed 0xRRGGBB
    pub color: u32,
    /// Consumed by a match; dropped on the next step
    pub popped: bool,
}

/// A particle for visual effects (not gameplay-affecting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Units per step
    pub vel: Vec2,
    pub color: u32,
    /// 1.0 at birth, removed at 0
    pub life: f32,
}

impl Particle {
    /// Radial burst of particles around a point
    pub fn explosion(pos: Vec2, color: u32) -> impl Iterator<Item = Particle> {
        (0..EXPLOSION_PARTICLES).map(move |i| {
            let angle = std::f32::consts::TAU * i as f32 / EXPLOSION_PARTICLES as f32;
            Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * EXPLOSION_SPEED,
                color,
                life: 1.0,
            }
        })
    }
}

/// Notable things that happened, drained by the presentation once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32, kind: BalloonKind },
    Popped { id: u32, kind: BalloonKind, points: u64 },
    TrapTriggered { id: u32 },
    Escaped { id: u32, kind: BalloonKind },
    LifeLost { lives: u8 },
    EffectStarted(EffectKind),
    /// An active effect was re-armed; its countdown restarted
    EffectRenewed(EffectKind),
    EffectEnded(EffectKind),
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Complete session state (deterministic given the RNG and frame times)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Current phase
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    /// Highest level that may be started; never decreases
    pub unlocked_level: u32,
    pub score: u64,
    pub lives: u8,
    /// Balloons cleared in the current level (traps don't count)
    pub cleared: u32,
    /// Pending digits, at most `MAX_INPUT_DIGITS`
    pub input: String,
    /// Live balloons (spawn order)
    pub balloons: Vec<Balloon>,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub effects: ActiveEffects,
    /// Simulated milliseconds in the current level (frozen while paused)
    pub clock_ms: f64,
    /// Session time of the last spawn; `None` spawns on the next step
    pub last_spawn_ms: Option<f64>,
    /// Pending events for the presentation
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Splash,
            level: 1,
            unlocked_level: 1,
            score: 0,
            lives: MAX_LIVES,
            cleared: 0,
            input: String::with_capacity(MAX_INPUT_DIGITS),
            balloons: Vec::new(),
            particles: Vec::new(),
            effects: ActiveEffects::default(),
            clock_ms: 0.0,
            last_spawn_ms: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset everything a fresh run of `level` needs; progress is kept
    pub fn reset_for_level(&mut self, level: u32) {
        self.level = level;
        self.score = 0;
        self.lives = MAX_LIVES;
        self.cleared = 0;
        self.input.clear();
        self.balloons.clear();
        self.particles.clear();
        self.effects = ActiveEffects::default();
        self.clock_ms = 0.0;
        self.last_spawn_ms = None;
    }

    /// Deduct one life, never below zero
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost { lives: self.lives });
    }

    /// Add particles, dropping the oldest beyond `cap`
    pub fn push_particles(&mut self, particles: impl IntoIterator<Item = Particle>, cap: usize) {
        if cap == 0 {
            return;
        }
        self.particles.extend(particles);
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    /// Move to a new phase, recording the change
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            self.phase = to;
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Live balloons that can still be matched
    pub fn matchable(&self) -> impl Iterator<Item = &Balloon> {
        self.balloons.iter().filter(|b| !b.popped)
    }
}
