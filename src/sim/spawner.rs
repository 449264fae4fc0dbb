//! Falling object spawning
//!
//! Regular objects (common or hazard) roll every tick with a probability that
//! scales with difficulty. Bonuses ignore difficulty and fire on fixed
//! wall-clock intervals, each kind on its own timer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::difficulty::spawn_chance;
use crate::Millis;
use crate::catalog::ItemKind;
use crate::consts::SPAWN_MARGIN;
use crate::tuning::Tuning;

/// A spawn decision: what, and where across the play area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub kind: ItemKind,
    pub x: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub next_gold: Millis,
    pub next_multiplier: Millis,
    pub next_shield: Millis,
}

impl Spawner {
    /// Arm every bonus timer one interval after `now`
    pub fn new(now: Millis, tuning: &Tuning) -> Self {
        Self {
            next_gold: now + tuning.gold_interval_ms,
            next_multiplier: now + tuning.multiplier_interval_ms,
            next_shield: now + tuning.shield_interval_ms,
        }
    }

    /// Decide this tick's spawns
    pub fn update<R: Rng>(
        &mut self,
        rng: &mut R,
        now: Millis,
        width: f32,
        difficulty: f32,
        time_scale: f32,
        tuning: &Tuning,
    ) -> Vec<Spawn> {
        let mut spawns = Vec::new();

        if rng.random_bool(probability(spawn_chance(difficulty, time_scale, tuning))) {
            let kind = if rng.random_bool(probability(tuning.hazard_chance)) {
                ItemKind::Hazard
            } else {
                ItemKind::Common
            };
            spawns.push(Spawn {
                kind,
                x: spawn_x(rng, width),
            });
        }

        let timers = [
            (ItemKind::Gold, &mut self.next_gold, tuning.gold_interval_ms),
            (ItemKind::Multiplier, &mut self.next_multiplier, tuning.multiplier_interval_ms),
            (ItemKind::Shield, &mut self.next_shield, tuning.shield_interval_ms),
        ];
        for (kind, next, interval) in timers {
            if now >= *next {
                *next += interval;
                log::debug!("Bonus spawn: {} (next at {:.0} ms)", kind.as_str(), *next);
                spawns.push(Spawn {
                    kind,
                    x: spawn_x(rng, width),
                });
            }
        }

        spawns
    }

    /// Push every timer forward (pause compensation)
    pub fn shift(&mut self, by: Millis) {
        self.next_gold += by;
        self.next_multiplier += by;
        self.next_shield += by;
    }
}

/// Clamp to `[0, 1]`; NaN becomes 0
fn probability(p: f64) -> f64 {
    p.max(0.0).min(1.0)
}

/// Uniform x inside `[margin, width - margin]`
fn spawn_x<R: Rng>(rng: &mut R, width: f32) -> f32 {
    let span = width - SPAWN_MARGIN * 2.0;
    if span <= 0.0 {
        return width / 2.0;
    }
    SPAWN_MARGIN + rng.random::<f32>() * span
}
