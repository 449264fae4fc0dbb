//! Timed global modifiers granted by bonus pickups

use serde::{Deserialize, Serialize};

use crate::Millis;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuffKind {
    /// Doubles points from common and gold pickups
    ScoreMultiplier,
    /// Absorbs hazard hits
    Shield,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub kind: BuffKind,
    pub expires_at: Millis,
}

/// Holds active buffs. Only presence per kind matters, so stacking the same
/// kind simply keeps it alive until the latest expiry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuffTracker {
    buffs: Vec<ActiveBuff>,
}

impl BuffTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: BuffKind, now: Millis, duration_ms: Millis) {
        self.buffs.push(ActiveBuff {
            kind,
            expires_at: now + duration_ms,
        });
    }

    /// Drop every buff whose expiry is not after `now`
    pub fn tick(&mut self, now: Millis) {
        self.buffs.retain(|b| b.expires_at > now);
    }

    pub fn is_active(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.kind == kind)
    }

    /// Time left on the longest-lived buff of `kind`
    pub fn remaining(&self, kind: BuffKind, now: Millis) -> Option<Millis> {
        self.buffs
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| (b.expires_at - now).max(0.0))
            .reduce(f64::max)
    }

    /// Push every expiry forward (pause compensation)
    pub fn shift(&mut self, by: Millis) {
        for buff in &mut self.buffs {
            buff.expires_at += by;
        }
    }
}
