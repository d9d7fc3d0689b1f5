//! Journey of Unity - simulation kernel for a cooperative puzzle platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, reveal, progression)
//! - `levels`: Level Provider contract and the built-in level set
//! - `platform`: Input/presentation/messaging collaborator contracts
//! - `tuning`: Data-driven game balance
//! - `error`: Level load and tuning errors

pub mod error;
pub mod levels;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use error::{LevelLoadError, TuningError};
pub use levels::{BuiltinLevels, JsonLevels, LevelDescriptor, LevelId, LevelProvider};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate, driven externally at display refresh
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default world dimensions (walls at x=0 and x=WORLD_WIDTH are implicit)
    pub const WORLD_WIDTH: f32 = 1200.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Message display duration when an event doesn't ask for one
    pub const DEFAULT_MESSAGE_MS: u32 = 3000;

    /// Convert a wall-clock delay to whole ticks (rounded up, never zero for a nonzero delay)
    #[inline]
    pub fn ms_to_ticks(ms: u32) -> u64 {
        (ms as u64 * TICKS_PER_SECOND as u64).div_ceil(1000)
    }
}
