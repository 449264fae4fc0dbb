//! Contact tests and pickup resolution
//!
//! Every body is treated as a circle: two bodies touch when the distance
//! between their centers is below the sum of their half-sizes.

use glam::Vec2;

use super::buffs::BuffKind;
use super::state::{GameEvent, SessionState};
use crate::Millis;
use crate::catalog::{AbilityKind, ItemKind};

/// Center-distance overlap test
#[inline]
pub fn overlaps(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    a.distance(b) < (a_size + b_size) / 2.0
}

/// Overlap at any moment while `a` moves by `a_step` and `b` by `b_step`
/// over the same tick
pub fn swept_overlaps(a: Vec2, a_step: Vec2, a_size: f32, b: Vec2, b_step: Vec2, b_size: f32) -> bool {
    let start = b - a;
    let closing = b_step - a_step;
    let speed_sq = closing.length_squared();
    let t = if speed_sq <= f32::EPSILON {
        0.0
    } else {
        (-start.dot(closing) / speed_sq).clamp(0.0, 1.0)
    };
    (start + closing * t).length() < (a_size + b_size) / 2.0
}

/// What an object ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Player,
    /// One of the phantom clones (hazards only)
    Clone,
}

/// Why a hazard did not hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Protection {
    pub shield: bool,
    pub phase: bool,
    pub god_mode: bool,
}

impl Protection {
    pub fn of(state: &SessionState, now: Millis) -> Self {
        Self {
            shield: state.buffs.is_active(BuffKind::Shield),
            phase: state.ability.is_running(AbilityKind::Phase, now),
            god_mode: state.god_mode,
        }
    }

    pub fn any(&self) -> bool {
        self.shield || self.phase || self.god_mode
    }
}

/// Apply the effect of an object reaching the ship (or a clone).
///
/// The item type is always recorded, whichever branch is taken.
pub fn resolve_contact(state: &mut SessionState, kind: ItemKind, contact: Contact, now: Millis) {
    state.collected_types.insert(kind);
    let multiplier = state.buffs.is_active(BuffKind::ScoreMultiplier);
    let points = |base: u64| if multiplier { base * 2 } else { base };

    let event = match kind {
        ItemKind::Hazard => {
            if contact == Contact::Clone {
                GameEvent::Intercepted
            } else if Protection::of(state, now).any() {
                GameEvent::Blocked
            } else {
                state.lives = state.lives.saturating_sub(1);
                state.hit_red_ever = true;
                state.consecutive_safe = 0;
                GameEvent::Damaged
            }
        }
        ItemKind::Common => {
            state.score += points(kind.base_points());
            state.items_collected += 1;
            state.consecutive_safe += 1;
            GameEvent::Collected
        }
        ItemKind::Gold => {
            state.score += points(kind.base_points());
            GameEvent::BonusCollected(kind)
        }
        ItemKind::Multiplier => {
            let duration = state.tuning.multiplier_duration_ms;
            state.buffs.add(BuffKind::ScoreMultiplier, now, duration);
            GameEvent::BonusCollected(kind)
        }
        ItemKind::Shield => {
            let duration = state.tuning.shield_duration_ms;
            state.buffs.add(BuffKind::Shield, now, duration);
            GameEvent::BonusCollected(kind)
        }
    };
    state.events.push(event);
}

/// One attractor step: move `pos` toward `target` by at most `speed`, if in range
pub fn attract(pos: Vec2, target: Vec2, radius: f32, speed: f32) -> Vec2 {
    let to_target = target - pos;
    let dist = to_target.length();
    if dist >= radius || dist <= f32::EPSILON {
        return pos;
    }
    pos + to_target.normalize() * speed.min(dist)
}
