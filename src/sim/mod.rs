//! Survival simulation module
//!
//! All gameplay logic lives here. This module is single-threaded and pure:
//! - The caller owns the `GameState` and hands it in by `&mut` each tick
//! - All randomness comes from the injected RNG
//! - Entities refer to each other by `EntityId`, never by reference
//! - No rendering or platform dependencies

pub mod actor;
pub mod adversary;
pub mod collision;
pub mod physics;
pub mod pickup;
pub mod projectile;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use spawn::Difficulty;
pub use state::{
    Actor, Adversary, Archetype, DEFAULT_PLATFORMS, Direction, EntityId, GameEvent, GameState,
    Pickup, PickupKind, Platform, Projectile, ProjectileSource, RunSummary, Snapshot,
};
pub use tick::{Step, TickInput, check_terminal, tick};
