//! Session state and core simulation types
//!
//! Everything the tick mutates lives in `SessionState`. Rendering and input
//! only ever read it (input writes the pointer target through `TickInput`).

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ability::AbilityState;
use super::buffs::BuffTracker;
use super::spawner::{Spawn, Spawner};
use crate::Millis;
use crate::achievements::GameStats;
use crate::catalog::{AbilityKind, ItemKind, ShipDefinition, default_ship};
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Playing,
    /// No ticks run until resumed
    Paused,
    /// Lives ran out
    Lost,
    /// Player quit
    Exited,
}

impl SessionPhase {
    pub fn is_over(self) -> bool {
        matches!(self, SessionPhase::Lost | SessionPhase::Exited)
    }
}

/// Discrete things that happened during a tick, drained by the session driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameEvent {
    /// Common item picked up
    Collected,
    /// Gold, multiplier or shield picked up
    BonusCollected(ItemKind),
    /// Hazard hit an unprotected ship
    Damaged,
    /// Hazard absorbed by shield, phase or god mode
    Blocked,
    /// Hazard destroyed by a phantom clone
    Intercepted,
    /// Hazard destroyed by a projectile
    HazardShot,
    AbilityUsed(AbilityKind),
    HazardsCleared(u32),
    LifeGranted,
    SessionLost,
}

/// The player's ship
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// Where the pointer last asked the ship to go
    pub target_x: f32,
    pub size: f32,
}

impl Player {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Ease toward the target by `lerp` of the remaining distance
    pub fn ease_toward_target(&mut self, lerp: f32) {
        self.x += (self.target_x - self.x) * lerp;
    }

    /// Visual bank angle toward the target
    pub fn tilt(&self) -> f32 {
        ((self.target_x - self.x) * TILT_FACTOR).clamp(-MAX_TILT, MAX_TILT)
    }
}

/// A falling item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FallingObject {
    pub id: u32,
    pub pos: Vec2,
    pub kind: ItemKind,
    pub size: f32,
}

/// A shot fired upward by the shooter ability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
}

/// Everything a session needs before its first tick
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    /// Hazards never cost lives
    pub god_mode: bool,
    /// Daily streak carried in from progression
    pub streak_days: u32,
    pub ship: &'static ShipDefinition,
    pub tuning: Tuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            width: 400.0,
            height: 700.0,
            god_mode: false,
            streak_days: 0,
            ship: default_ship(),
            tuning: Tuning::default(),
        }
    }
}

/// Complete mutable state of one play-through
#[derive(Debug, Clone)]
pub struct SessionState {
    pub tuning: Tuning,
    pub width: f32,
    pub height: f32,
    pub god_mode: bool,
    pub streak_days_at_start: u32,
    pub ship: &'static ShipDefinition,

    pub phase: SessionPhase,
    pub score: u64,
    pub lives: u32,
    pub items_collected: u32,
    pub consecutive_safe: u32,
    /// Sticky once any hazard actually cost a life
    pub hit_red_ever: bool,
    pub collected_types: BTreeSet<ItemKind>,
    pub difficulty: f32,
    /// 1.0 normally, lower while time-slow runs
    pub time_scale: f32,

    pub start_time: Millis,
    pub total_paused_ms: Millis,
    pub pause_started: Option<Millis>,
    pub last_tick: Millis,
    pub time_ticks: u64,

    pub player: Player,
    pub objects: Vec<FallingObject>,
    pub projectiles: Vec<Projectile>,
    pub buffs: BuffTracker,
    pub ability: AbilityState,
    pub spawner: Spawner,

    /// Events raised since the last drain
    pub events: Vec<GameEvent>,

    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl SessionState {
    pub fn new(config: SessionConfig, now: Millis) -> Self {
        let SessionConfig {
            seed,
            width,
            height,
            god_mode,
            streak_days,
            ship,
            tuning,
        } = config;
        if let Err(e) = tuning.validate() {
            log::warn!("Starting session with out-of-range tuning: {}", e);
        }

        let player = Player {
            x: width / 2.0,
            y: height - PLAYER_BOTTOM_OFFSET,
            target_x: width / 2.0,
            size: tuning.player_size,
        };

        Self {
            width,
            height,
            god_mode,
            streak_days_at_start: streak_days,
            ship,
            phase: SessionPhase::Playing,
            score: 0,
            lives: tuning.lives_start,
            items_collected: 0,
            consecutive_safe: 0,
            hit_red_ever: false,
            collected_types: BTreeSet::new(),
            difficulty: 1.0,
            time_scale: 1.0,
            start_time: now,
            total_paused_ms: 0.0,
            pause_started: None,
            last_tick: now,
            time_ticks: 0,
            player,
            objects: Vec::new(),
            projectiles: Vec::new(),
            buffs: BuffTracker::new(),
            ability: AbilityState::new(ship.ability, tuning.ability_spec(ship.ability)),
            spawner: Spawner::new(now, &tuning),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            tuning,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn spawn_object(&mut self, spawn: Spawn) {
        let id = self.next_entity_id();
        self.objects.push(FallingObject {
            id,
            pos: Vec2::new(spawn.x, SPAWN_Y),
            kind: spawn.kind,
            size: self.tuning.object_size,
        });
    }

    pub fn fire_projectile(&mut self) {
        let id = self.next_entity_id();
        let pos = Vec2::new(self.player.x, self.player.y - self.player.size / 2.0);
        self.projectiles.push(Projectile { id, pos });
    }

    /// Play time in seconds, pauses excluded
    pub fn elapsed_secs(&self, now: Millis) -> f32 {
        let now = self.pause_started.map_or(now, |p| now.min(p));
        ((now - self.start_time - self.total_paused_ms) / 1000.0).max(0.0) as f32
    }

    /// Positions of the two phantom clones while the ability runs
    pub fn clone_positions(&self, now: Millis) -> Option<[Vec2; 2]> {
        if !self.ability.is_running(AbilityKind::Clones, now) {
            return None;
        }
        let offset = Vec2::new(self.tuning.clone_offset, 0.0);
        let pos = self.player.pos();
        Some([pos - offset, pos + offset])
    }

    /// Running statistics snapshot for achievements and the final result
    pub fn stats(&self, now: Millis) -> GameStats {
        GameStats {
            score: self.score,
            items_collected: self.items_collected,
            consecutive_safe: self.consecutive_safe,
            time_played: self.elapsed_secs(now) as f64,
            hit_red: self.hit_red_ever,
            streak_days: self.streak_days_at_start,
            collected_types: self.collected_types.iter().copied().collect(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ship_by_id;

    #[test]
    fn test_new_session_defaults() {
        let state = SessionState::new(SessionConfig::default(), 500.0);
        assert_eq!(state.phase, SessionPhase::Playing);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.x, 200.0);
        assert_eq!(state.player.y, 640.0);
        assert_eq!(state.spawner.next_multiplier, 30_500.0);
        assert_eq!(state.ability.kind, AbilityKind::None);
    }

    #[test]
    fn test_ability_copied_from_ship() {
        let config = SessionConfig {
            ship: ship_by_id("aegis").unwrap(),
            ..Default::default()
        };
        let state = SessionState::new(config, 0.0);
        assert_eq!(state.ability.kind, AbilityKind::AreaClear);
        assert_eq!(state.ability.spec.cooldown_ms, 300_000.0);
    }

    #[test]
    fn test_elapsed_excludes_pauses() {
        let mut state = SessionState::new(SessionConfig::default(), 1000.0);
        state.total_paused_ms = 2000.0;
        assert_eq!(state.elapsed_secs(13_000.0), 10.0);

        state.pause_started = Some(13_000.0);
        assert_eq!(state.elapsed_secs(50_000.0), 10.0);
    }

    #[test]
    fn test_tilt_is_clamped() {
        let mut player = SessionState::new(SessionConfig::default(), 0.0).player;
        player.target_x = player.x + 10.0;
        assert!((player.tilt() - 0.1).abs() < 1e-6);
        player.target_x = player.x - 500.0;
        assert_eq!(player.tilt(), -MAX_TILT);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = SessionState::new(SessionConfig::default(), 0.0);
        state.spawn_object(Spawn {
            kind: ItemKind::Common,
            x: 100.0,
        });
        state.fire_projectile();
        assert_ne!(state.objects[0].id, state.projectiles[0].id);
        assert_eq!(state.objects[0].pos.y, SPAWN_Y);
    }
}
