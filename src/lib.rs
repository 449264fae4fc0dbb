//! Star Catch - a falling-object catch/avoid arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spawning, difficulty, motion, collisions, buffs, abilities)
//! - `catalog`: Item and ship tables
//! - `achievements`: Achievement predicates and the per-session evaluator
//! - `session`: Session driver, collaborator interfaces, final stats
//! - `progression`: High score, daily streak, unlocked achievements, ship unlocks
//! - `tuning`: Data-driven game balance

pub mod achievements;
pub mod audio;
pub mod catalog;
pub mod error;
pub mod progression;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use achievements::{AchievementEvaluator, GameStats};
pub use catalog::{AbilityKind, ItemKind, ShipDefinition};
pub use error::{Result, StarCatchError};
pub use progression::Progression;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Host timestamps, in milliseconds
pub type Millis = f64;

/// Game configuration constants
pub mod consts {
    use crate::Millis;

    /// Nominal frame length (one tick per animation frame at 60 Hz)
    pub const FRAME_MS: Millis = 1000.0 / 60.0;

    /// Player collision center sits this far above the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;

    /// Objects enter from above the visible area
    pub const SPAWN_Y: f32 = -50.0;
    /// Horizontal keep-out at both edges for spawn positions
    pub const SPAWN_MARGIN: f32 = 40.0;
    /// Objects are discarded once this far below the bottom edge
    pub const DESPAWN_MARGIN: f32 = 50.0;

    /// Ship tilt follows the distance to the pointer target
    pub const TILT_FACTOR: f32 = 0.01;
    pub const MAX_TILT: f32 = 0.4;

    /// Delay before the platinum unlock is announced
    pub const PLATINUM_DELAY_MS: Millis = 2000.0;

    /// Sessions must reach this score to count toward the daily streak
    pub const STREAK_MIN_SCORE: u64 = 500;
}

/// Clamp a horizontal center so a body of `size` stays inside `[0, width]`
#[inline]
pub fn clamp_to_area(x: f32, size: f32, width: f32) -> f32 {
    let half = size / 2.0;
    if width <= size {
        return width / 2.0;
    }
    x.clamp(half, width - half)
}
