//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied frame timestamps only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod effects;
pub mod problem;
pub mod resolve;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use effects::{ActiveEffects, EffectKind};
pub use problem::{Problem, generate_problem};
pub use resolve::{MatchOutcome, apply_outcome, resolve};
pub use session::{Session, Snapshot};
pub use spawn::spawn_balloon;
pub use state::{Balloon, BalloonKind, GameEvent, GamePhase, Particle, SessionState};
pub use tick::{StepReport, step};
