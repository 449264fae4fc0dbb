//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, driven by host timestamps
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod ability;
pub mod buffs;
pub mod collision;
pub mod difficulty;
pub mod spawner;
pub mod state;
pub mod tick;

pub use ability::{AbilitySpec, AbilityState, AbilityStatus, Activation};
pub use buffs::{ActiveBuff, BuffKind, BuffTracker};
pub use collision::{Contact, Protection, overlaps, resolve_contact};
pub use difficulty::{difficulty, player_lerp, spawn_chance};
pub use spawner::{Spawn, Spawner};
pub use state::{
    FallingObject, GameEvent, Player, Projectile, SessionConfig, SessionPhase, SessionState,
};
pub use tick::{TickInput, autopilot_input, exit, pause, resume, tick};
