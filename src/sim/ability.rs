//! Ship special abilities
//!
//! One state machine shared by every ability kind; only the activation
//! outcome differs:
//! - timed kinds: Ready -> Active -> Cooling -> Ready
//! - area-clear: Ready -> Cooling -> Ready, with an instant hazard wipe
//! - extra-life: Ready -> Consumed, once per session
//!
//! Activating while not ready is a no-op.

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::catalog::AbilityKind;

/// Timing for one ability kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilitySpec {
    pub cooldown_ms: Millis,
    /// Length of the active window (0 for instant abilities)
    pub duration_ms: Millis,
}

/// Externally visible ability state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AbilityStatus {
    /// Ship has no ability
    Unavailable,
    Ready,
    Active,
    Cooling,
    /// One-shot ability already used this session
    Consumed,
}

/// What an activation request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Not ready (or no ability); nothing changed
    Ignored,
    /// An effect window opened
    Timed,
    /// Remove every hazard on screen
    ClearHazards,
    /// Add one life
    GrantLife,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityState {
    pub kind: AbilityKind,
    pub spec: AbilitySpec,
    pub last_used: Option<Millis>,
    pub active_until: Option<Millis>,
    pub one_shot_consumed: bool,
    /// Last projectile fired (shooter only)
    pub last_shot: Option<Millis>,
}

impl AbilityState {
    pub fn new(kind: AbilityKind, spec: AbilitySpec) -> Self {
        Self {
            kind,
            spec,
            last_used: None,
            active_until: None,
            one_shot_consumed: false,
            last_shot: None,
        }
    }

    pub fn status(&self, now: Millis) -> AbilityStatus {
        if self.kind == AbilityKind::None {
            return AbilityStatus::Unavailable;
        }
        if self.kind.is_one_shot() {
            return if self.one_shot_consumed {
                AbilityStatus::Consumed
            } else {
                AbilityStatus::Ready
            };
        }
        if self.is_active(now) {
            return AbilityStatus::Active;
        }
        match self.last_used {
            None => AbilityStatus::Ready,
            Some(used) if now - used >= self.spec.cooldown_ms => AbilityStatus::Ready,
            Some(_) => AbilityStatus::Cooling,
        }
    }

    pub fn is_ready(&self, now: Millis) -> bool {
        self.status(now) == AbilityStatus::Ready
    }

    /// Inside the effect window
    pub fn is_active(&self, now: Millis) -> bool {
        self.active_until.is_some_and(|until| now < until)
    }

    /// Shorthand for "this ship's ability is `kind` and it is running"
    pub fn is_running(&self, kind: AbilityKind, now: Millis) -> bool {
        self.kind == kind && self.is_active(now)
    }

    pub fn cooldown_remaining(&self, now: Millis) -> Millis {
        match (self.kind.is_one_shot(), self.last_used) {
            (false, Some(used)) => (used + self.spec.cooldown_ms - now).max(0.0),
            _ => 0.0,
        }
    }

    pub fn try_activate(&mut self, now: Millis) -> Activation {
        if !self.is_ready(now) {
            return Activation::Ignored;
        }
        self.last_used = Some(now);
        match self.kind {
            AbilityKind::ExtraLife => {
                self.one_shot_consumed = true;
                Activation::GrantLife
            }
            AbilityKind::AreaClear => {
                self.active_until = None;
                Activation::ClearHazards
            }
            kind if kind.has_duration() => {
                self.active_until = Some(now + self.spec.duration_ms);
                self.last_shot = None;
                Activation::Timed
            }
            _ => Activation::Ignored,
        }
    }

    /// Returns true when the shooter should fire a projectile this tick
    pub fn shot_due(&mut self, now: Millis, interval_ms: Millis) -> bool {
        if !self.is_running(AbilityKind::Shooter, now) {
            return false;
        }
        let due = self.last_shot.is_none_or(|last| now - last >= interval_ms);
        if due {
            self.last_shot = Some(now);
        }
        due
    }

    /// Push every timestamp forward (pause compensation)
    pub fn shift(&mut self, by: Millis) {
        for stamp in [&mut self.last_used, &mut self.active_until, &mut self.last_shot] {
            if let Some(t) = stamp {
                *t += by;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(kind: AbilityKind) -> AbilityState {
        AbilityState::new(
            kind,
            AbilitySpec {
                cooldown_ms: 30_000.0,
                duration_ms: 5_000.0,
            },
        )
    }

    #[test]
    fn test_cooldown_cycle() {
        let mut ability = timed(AbilityKind::Attractor);
        assert!(ability.is_ready(0.0));
        assert_eq!(ability.try_activate(0.0), Activation::Timed);

        assert_eq!(ability.status(1000.0), AbilityStatus::Active);
        for t in [5000.0, 12_000.0, 29_999.0] {
            assert!(!ability.is_ready(t), "should not be ready at {t}");
        }
        assert_eq!(ability.status(5000.0), AbilityStatus::Cooling);
        assert!(ability.is_ready(30_000.0));
    }

    #[test]
    fn test_activation_while_cooling_is_noop() {
        let mut ability = timed(AbilityKind::Phase);
        ability.try_activate(0.0);
        assert_eq!(ability.try_activate(10_000.0), Activation::Ignored);
        assert_eq!(ability.last_used, Some(0.0));
        assert_eq!(ability.active_until, Some(5000.0));
        assert_eq!(ability.cooldown_remaining(10_000.0), 20_000.0);
    }

    #[test]
    fn test_none_is_never_ready() {
        let mut ability = timed(AbilityKind::None);
        assert_eq!(ability.status(0.0), AbilityStatus::Unavailable);
        assert_eq!(ability.try_activate(0.0), Activation::Ignored);
        assert!(ability.last_used.is_none());
    }

    #[test]
    fn test_extra_life_is_one_shot() {
        let mut ability = timed(AbilityKind::ExtraLife);
        assert_eq!(ability.try_activate(0.0), Activation::GrantLife);
        assert_eq!(ability.status(1_000_000.0), AbilityStatus::Consumed);
        assert_eq!(ability.try_activate(1_000_000.0), Activation::Ignored);
    }

    #[test]
    fn test_area_clear_has_no_window() {
        let mut ability = AbilityState::new(
            AbilityKind::AreaClear,
            AbilitySpec {
                cooldown_ms: 300_000.0,
                duration_ms: 0.0,
            },
        );
        assert_eq!(ability.try_activate(100.0), Activation::ClearHazards);
        assert!(!ability.is_active(100.0));
        assert_eq!(ability.status(100.0), AbilityStatus::Cooling);
        assert!(ability.is_ready(300_100.0));
    }

    #[test]
    fn test_shooter_cadence() {
        let mut ability = timed(AbilityKind::Shooter);
        assert!(!ability.shot_due(0.0, 200.0));
        ability.try_activate(0.0);
        assert!(ability.shot_due(0.0, 200.0));
        assert!(!ability.shot_due(100.0, 200.0));
        assert!(ability.shot_due(200.0, 200.0));
        assert!(!ability.shot_due(6000.0, 200.0));
    }

    #[test]
    fn test_shift_moves_all_timestamps() {
        let mut ability = timed(AbilityKind::TimeSlow);
        ability.try_activate(1000.0);
        ability.shift(4000.0);
        assert_eq!(ability.last_used, Some(5000.0));
        assert_eq!(ability.active_until, Some(10_000.0));
        assert!(!ability.is_ready(34_999.0));
        assert!(ability.is_ready(35_000.0));
    }
}
