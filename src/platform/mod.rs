//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Seeding from the wall clock
//! - The JavaScript bridge (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Seed derived from the current time, for runs without a configured seed
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
pub fn clock_seed() -> u64 {
    js_sys::Date::now() as u64
}

/// Configured seed, or one from the clock
pub fn resolve_seed(configured: Option<u64>) -> u64 {
    configured.unwrap_or_else(clock_seed)
}
