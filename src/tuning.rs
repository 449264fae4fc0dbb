//! Data-driven game balance
//!
//! Every gameplay number lives here so it can be tweaked from JSON without
//! touching the simulation. Missing fields fall back to the shipped defaults.

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::catalog::AbilityKind;
use crate::error::{Result, StarCatchError};
use crate::sim::ability::AbilitySpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Bodies ===
    pub player_size: f32,
    pub object_size: f32,
    pub lives_start: u32,

    // === Spawning ===
    /// Per-tick spawn probability is `difficulty / spawn_rate`
    pub spawn_rate: f32,
    /// Share of regular spawns that are hazards
    pub hazard_chance: f64,
    pub gold_interval_ms: Millis,
    pub multiplier_interval_ms: Millis,
    pub shield_interval_ms: Millis,

    // === Falling ===
    /// Pixels per tick at difficulty 1
    pub gravity: f32,
    pub time_coefficient: f32,
    pub score_coefficient: f32,

    // === Buffs ===
    pub multiplier_duration_ms: Millis,
    pub shield_duration_ms: Millis,

    // === Ship handling ===
    pub base_lerp: f32,
    pub lerp_time_growth: f32,
    pub lerp_score_growth: f32,
    pub lerp_cap: f32,
    pub boost_lerp_multiplier: f32,
    pub boost_lerp_cap: f32,

    // === Abilities ===
    pub ability_duration_ms: Millis,
    pub ability_cooldown_ms: Millis,
    /// Area-clear is instant, with a much longer cooldown
    pub area_clear_cooldown_ms: Millis,
    pub projectile_interval_ms: Millis,
    /// Pixels per tick, upward
    pub projectile_speed: f32,
    pub projectile_size: f32,
    pub attractor_radius: f32,
    /// Pixels per tick toward the ship
    pub attractor_speed: f32,
    pub clone_offset: f32,
    pub time_slow_scale: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 40.0,
            object_size: 30.0,
            lives_start: 3,

            spawn_rate: 15.0,
            hazard_chance: 0.25,
            gold_interval_ms: 45_000.0,
            multiplier_interval_ms: 30_000.0,
            shield_interval_ms: 60_000.0,

            gravity: 4.0,
            time_coefficient: 0.015,
            score_coefficient: 0.0015,

            multiplier_duration_ms: 5_000.0,
            shield_duration_ms: 7_000.0,

            base_lerp: 0.2,
            lerp_time_growth: 0.0005,
            lerp_score_growth: 0.0001,
            lerp_cap: 0.35,
            boost_lerp_multiplier: 2.0,
            boost_lerp_cap: 0.6,

            ability_duration_ms: 3_000.0,
            ability_cooldown_ms: 30_000.0,
            area_clear_cooldown_ms: 300_000.0,
            projectile_interval_ms: 200.0,
            projectile_speed: 12.0,
            projectile_size: 8.0,
            attractor_radius: 250.0,
            attractor_speed: 8.0,
            clone_offset: 60.0,
            time_slow_scale: 0.5,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides and reject unusable values
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("player_size", self.player_size),
            ("object_size", self.object_size),
            ("spawn_rate", self.spawn_rate),
            ("gravity", self.gravity),
            ("projectile_speed", self.projectile_speed),
            ("projectile_size", self.projectile_size),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let intervals = [
            ("gold_interval_ms", self.gold_interval_ms),
            ("multiplier_interval_ms", self.multiplier_interval_ms),
            ("shield_interval_ms", self.shield_interval_ms),
            ("projectile_interval_ms", self.projectile_interval_ms),
        ];
        for (name, value) in intervals {
            if !(value > 0.0) {
                return Err(invalid(format!("{name} must be positive, got {value}")));
            }
        }

        if self.lives_start == 0 {
            return Err(invalid("lives_start must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.hazard_chance) {
            return Err(invalid(format!(
                "hazard_chance must be within [0, 1], got {}",
                self.hazard_chance
            )));
        }
        if self.time_coefficient < 0.0 || self.score_coefficient < 0.0 {
            return Err(invalid("difficulty coefficients must not be negative".into()));
        }
        for (name, value) in [("lerp_cap", self.lerp_cap), ("boost_lerp_cap", self.boost_lerp_cap)] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(format!("{name} must be within (0, 1], got {value}")));
            }
        }
        if !(self.time_slow_scale > 0.0 && self.time_slow_scale <= 1.0) {
            return Err(invalid(format!(
                "time_slow_scale must be within (0, 1], got {}",
                self.time_slow_scale
            )));
        }
        Ok(())
    }

    /// Cooldown and active window for a ship ability
    pub fn ability_spec(&self, kind: AbilityKind) -> AbilitySpec {
        match kind {
            AbilityKind::None | AbilityKind::ExtraLife => AbilitySpec {
                cooldown_ms: 0.0,
                duration_ms: 0.0,
            },
            AbilityKind::AreaClear => AbilitySpec {
                cooldown_ms: self.area_clear_cooldown_ms,
                duration_ms: 0.0,
            },
            _ => AbilitySpec {
                cooldown_ms: self.ability_cooldown_ms,
                duration_ms: self.ability_duration_ms,
            },
        }
    }
}

fn invalid(reason: String) -> StarCatchError {
    log::warn!("Rejected tuning: {}", reason);
    StarCatchError::InvalidTuning(reason)
}
