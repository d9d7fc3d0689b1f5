//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - No randomness
//! - Stable iteration order (actors in role order, solids in insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod controls;
pub mod geometry;
pub mod physics;
pub mod progression;
pub mod reveal;
pub mod schedule;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod test_support;

pub use collision::Contacts;
pub use geometry::{Axis, Mtv, Rect, intersects, mtv, separate};
pub use progression::{load_level, restart_level, spawn_exit_gate};
pub use schedule::{Deferred, Schedule, ScheduledEvent};
pub use state::{
    Abilities, Actor, BridgeSpec, Collectible, ExitGate, GamePhase, IlluminatedArea, Message,
    Offerings, Role, Solid, SolidKind, Switch, SwitchKind, WorldState,
};
pub use tick::{Control, ControlSet, TickInput, tick};
