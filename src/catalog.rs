//! Static item and ship tables
//!
//! Read-only data consumed by the simulation: what each falling item looks
//! like and is worth, and which ships exist, what they can do, and how they
//! are unlocked.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StarCatchError};

/// Falling item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Blue sphere, +1
    Common,
    /// Red cube, costs a life
    Hazard,
    /// Gold pentagon, +10
    Gold,
    /// Yellow triangle, 2x score buff
    Multiplier,
    /// Purple hexagon, shield buff
    Shield,
}

/// How an item is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemShape {
    Sphere,
    /// Spinning square
    Cube,
    /// Spinning regular polygon
    Polygon { sides: u8 },
}

impl ItemKind {
    pub const ALL: [ItemKind; 5] = [
        ItemKind::Common,
        ItemKind::Hazard,
        ItemKind::Gold,
        ItemKind::Multiplier,
        ItemKind::Shield,
    ];

    /// Bonus kinds spawned on fixed wall-clock intervals
    pub const BONUSES: [ItemKind; 3] = [ItemKind::Gold, ItemKind::Multiplier, ItemKind::Shield];

    pub fn is_hazard(self) -> bool {
        self == ItemKind::Hazard
    }

    pub fn is_bonus(self) -> bool {
        Self::BONUSES.contains(&self)
    }

    /// Points awarded without a multiplier
    pub fn base_points(self) -> u64 {
        match self {
            ItemKind::Common => 1,
            ItemKind::Gold => 10,
            _ => 0,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ItemKind::Common => "#3b82f6",
            ItemKind::Hazard => "#ef4444",
            ItemKind::Gold => "#fbbf24",
            ItemKind::Multiplier => "#facc15",
            ItemKind::Shield => "#a855f7",
        }
    }

    pub fn shape(self) -> ItemShape {
        match self {
            ItemKind::Common => ItemShape::Sphere,
            ItemKind::Hazard => ItemShape::Cube,
            ItemKind::Gold => ItemShape::Polygon { sides: 5 },
            ItemKind::Multiplier => ItemShape::Polygon { sides: 3 },
            ItemKind::Shield => ItemShape::Polygon { sides: 6 },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Common => "common",
            ItemKind::Hazard => "hazard",
            ItemKind::Gold => "gold",
            ItemKind::Multiplier => "multiplier",
            ItemKind::Shield => "shield",
        }
    }
}

/// Ship special abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityKind {
    None,
    /// Fires projectiles upward that destroy hazards
    Shooter,
    /// Pulls nearby non-hazard items toward the ship
    Attractor,
    /// Halves world speed
    TimeSlow,
    /// Two phantom clones that intercept hazards
    Clones,
    /// Instantly removes every hazard on screen
    AreaClear,
    /// Doubles ship responsiveness
    SpeedBoost,
    /// One extra life per session
    ExtraLife,
    /// Hazards pass through the ship
    Phase,
}

impl AbilityKind {
    /// Fires once per session instead of cycling through a cooldown
    pub fn is_one_shot(self) -> bool {
        self == AbilityKind::ExtraLife
    }

    /// Has an effect window after activation (area-clear and extra-life are instant)
    pub fn has_duration(self) -> bool {
        !matches!(
            self,
            AbilityKind::None | AbilityKind::AreaClear | AbilityKind::ExtraLife
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            AbilityKind::None => "None",
            AbilityKind::Shooter => "Blaster",
            AbilityKind::Attractor => "Magnet",
            AbilityKind::TimeSlow => "Slow Time",
            AbilityKind::Clones => "Phantoms",
            AbilityKind::AreaClear => "Shockwave",
            AbilityKind::SpeedBoost => "Afterburner",
            AbilityKind::ExtraLife => "Extra Heart",
            AbilityKind::Phase => "Phase Shift",
        }
    }
}

/// Ship silhouettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipShape {
    Default,
    Fighter,
    Tank,
    Ufo,
    Needle,
    Shuriken,
    Stealth,
    Ghost,
    Aegis,
}

/// What a player must do before a ship can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRequirement {
    Free,
    Achievement(&'static str),
    /// Number of times the game has been shared
    Shares(u32),
}

/// A selectable ship (read-only)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipDefinition {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub shape: ShipShape,
    pub ability: AbilityKind,
    pub unlock: UnlockRequirement,
    /// How to unlock, shown in the hangar
    pub description: &'static str,
}

pub const DEFAULT_SHIP_ID: &str = "default";

pub static SHIPS: &[ShipDefinition] = &[
    ShipDefinition {
        id: DEFAULT_SHIP_ID,
        name: "Scout",
        color: "#38bdf8",
        shape: ShipShape::Default,
        ability: AbilityKind::None,
        unlock: UnlockRequirement::Free,
        description: "Available from the start",
    },
    ShipDefinition {
        id: "fighter",
        name: "Fighter",
        color: "#f97316",
        shape: ShipShape::Fighter,
        ability: AbilityKind::Shooter,
        unlock: UnlockRequirement::Achievement("score_200"),
        description: "Score 200 points",
    },
    ShipDefinition {
        id: "ufo",
        name: "Saucer",
        color: "#22d3ee",
        shape: ShipShape::Ufo,
        ability: AbilityKind::Attractor,
        unlock: UnlockRequirement::Achievement("score_500"),
        description: "Score 500 points",
    },
    ShipDefinition {
        id: "stealth",
        name: "Stealth",
        color: "#64748b",
        shape: ShipShape::Stealth,
        ability: AbilityKind::TimeSlow,
        unlock: UnlockRequirement::Achievement("iron_nerves_10"),
        description: "Survive for 10 minutes",
    },
    ShipDefinition {
        id: "shuriken",
        name: "Shuriken",
        color: "#e879f9",
        shape: ShipShape::Shuriken,
        ability: AbilityKind::Clones,
        unlock: UnlockRequirement::Achievement("ninja_200"),
        description: "Score 200 without a single hit",
    },
    ShipDefinition {
        id: "aegis",
        name: "Aegis",
        color: "#fbbf24",
        shape: ShipShape::Aegis,
        ability: AbilityKind::AreaClear,
        unlock: UnlockRequirement::Shares(3),
        description: "Share the game 3 times",
    },
    ShipDefinition {
        id: "needle",
        name: "Needle",
        color: "#a3e635",
        shape: ShipShape::Needle,
        ability: AbilityKind::SpeedBoost,
        unlock: UnlockRequirement::Achievement("speed_run_50"),
        description: "Score 50 within 20 seconds",
    },
    ShipDefinition {
        id: "tank",
        name: "Tank",
        color: "#ef4444",
        shape: ShipShape::Tank,
        ability: AbilityKind::ExtraLife,
        unlock: UnlockRequirement::Achievement("safe_streak_50"),
        description: "Collect 50 in a row without damage",
    },
    ShipDefinition {
        id: "ghost",
        name: "Ghost",
        color: "#c4b5fd",
        shape: ShipShape::Ghost,
        ability: AbilityKind::Phase,
        unlock: UnlockRequirement::Achievement("invincible_500"),
        description: "Score 500 without a single hit",
    },
];

/// Look up a ship by id
pub fn ship_by_id(id: &str) -> Result<&'static ShipDefinition> {
    SHIPS
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| StarCatchError::UnknownShip(id.to_string()))
}

/// The ship every player starts with
pub fn default_ship() -> &'static ShipDefinition {
    &SHIPS[0]
}
