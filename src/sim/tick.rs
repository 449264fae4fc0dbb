//! Per-frame simulation tick
//!
//! One call advances the session by exactly one animation frame. Order:
//! buffs expire, ability request, difficulty, spawning, ship easing,
//! projectiles, attractor, falling objects and contacts, loss check.

use glam::Vec2;

use super::ability::Activation;
use super::collision::{Contact, attract, overlaps, resolve_contact, swept_overlaps};
use super::difficulty::{difficulty, player_lerp};
use super::state::{GameEvent, SessionPhase, SessionState};
use crate::catalog::{AbilityKind, ItemKind};
use crate::consts::DESPAWN_MARGIN;
use crate::{Millis, clamp_to_area};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal pointer position
    pub target_x: f32,
    /// Pointer/touch is held; the ship only steers while true
    pub pointer_active: bool,
    /// Ability button pressed this frame
    pub activate_ability: bool,
}

/// Advance the session by one frame at host time `now`
pub fn tick(state: &mut SessionState, input: &TickInput, now: Millis) {
    if state.phase != SessionPhase::Playing {
        return;
    }
    let now = now.max(state.last_tick);
    state.last_tick = now;
    state.time_ticks += 1;

    state.buffs.tick(now);

    if input.activate_ability {
        activate_ability(state, now);
    }

    state.time_scale = if state.ability.is_running(AbilityKind::TimeSlow, now) {
        state.tuning.time_slow_scale
    } else {
        1.0
    };

    let elapsed = state.elapsed_secs(now);
    state.difficulty = difficulty(elapsed, state.score, &state.tuning).max(state.difficulty);

    let spawns = state.spawner.update(
        &mut state.rng,
        now,
        state.width,
        state.difficulty,
        state.time_scale,
        &state.tuning,
    );
    for spawn in spawns {
        state.spawn_object(spawn);
    }

    // Ship easing
    if input.pointer_active {
        state.player.target_x = input.target_x;
        let boosted = state.ability.is_running(AbilityKind::SpeedBoost, now);
        let lerp = player_lerp(elapsed, state.score, boosted, &state.tuning);
        state.player.ease_toward_target(lerp);
    }
    state.player.x = clamp_to_area(state.player.x, state.player.size, state.width);

    update_projectiles(state, now);

    if state.ability.is_running(AbilityKind::Attractor, now) {
        let target = state.player.pos();
        let radius = state.tuning.attractor_radius;
        let speed = state.tuning.attractor_speed * state.time_scale;
        for obj in state.objects.iter_mut().filter(|o| !o.kind.is_hazard()) {
            obj.pos = attract(obj.pos, target, radius, speed);
        }
    }

    update_objects(state, now);

    if state.lives == 0 {
        state.phase = SessionPhase::Lost;
        state.events.push(GameEvent::SessionLost);
        log::info!(
            "Session lost: score={} items={} time={:.1}s",
            state.score,
            state.items_collected,
            elapsed
        );
    }
}

fn activate_ability(state: &mut SessionState, now: Millis) {
    let kind = state.ability.kind;
    match state.ability.try_activate(now) {
        Activation::Ignored => return,
        Activation::Timed => {}
        Activation::ClearHazards => {
            let before = state.objects.len();
            state.objects.retain(|o| !o.kind.is_hazard());
            let cleared = (before - state.objects.len()) as u32;
            state.events.push(GameEvent::HazardsCleared(cleared));
        }
        Activation::GrantLife => {
            state.lives += 1;
            state.events.push(GameEvent::LifeGranted);
        }
    }
    log::debug!("Ability used: {} at {:.0} ms", kind.label(), now);
    state.events.push(GameEvent::AbilityUsed(kind));
}

/// Fire, advance and resolve shooter projectiles
fn update_projectiles(state: &mut SessionState, now: Millis) {
    if state.ability.shot_due(now, state.tuning.projectile_interval_ms) {
        state.fire_projectile();
    }
    if state.projectiles.is_empty() {
        return;
    }

    let rise = Vec2::new(0.0, -state.tuning.projectile_speed * state.time_scale);
    let fall = Vec2::new(0.0, fall_step(state));
    let shot_size = state.tuning.projectile_size;
    let objects = &mut state.objects;
    let mut hits = 0;

    // Hazards fall later this tick, so test along both paths
    state.projectiles.retain_mut(|shot| {
        let start = shot.pos;
        shot.pos += rise;
        let target = objects.iter().position(|o| {
            o.kind.is_hazard() && swept_overlaps(start, rise, shot_size, o.pos, fall, o.size)
        });
        if let Some(i) = target {
            objects.remove(i);
            hits += 1;
            return false;
        }
        shot.pos.y >= -shot_size
    });

    for _ in 0..hits {
        state.events.push(GameEvent::HazardShot);
    }
}

/// Distance every object falls this tick
fn fall_step(state: &SessionState) -> f32 {
    state.tuning.gravity * state.difficulty * state.time_scale
}

/// Let objects fall, then resolve everything touching the ship or a clone
fn update_objects(state: &mut SessionState, now: Millis) {
    let fall = fall_step(state);
    let player_pos = state.player.pos();
    let player_size = state.player.size;
    let clones = state.clone_positions(now);
    let floor = state.height + DESPAWN_MARGIN;
    let mut contacts: Vec<(ItemKind, Contact)> = Vec::new();

    state.objects.retain_mut(|obj| {
        obj.pos.y += fall;

        if overlaps(obj.pos, obj.size, player_pos, player_size) {
            contacts.push((obj.kind, Contact::Player));
            return false;
        }
        if obj.kind.is_hazard()
            && clones.is_some_and(|c| c.iter().any(|&p| overlaps(obj.pos, obj.size, p, player_size)))
        {
            contacts.push((obj.kind, Contact::Clone));
            return false;
        }
        obj.pos.y <= floor
    });

    for (kind, contact) in contacts {
        resolve_contact(state, kind, contact, now);
    }
}

/// Stop ticking; the host stops scheduling frames
pub fn pause(state: &mut SessionState, now: Millis) {
    if state.phase == SessionPhase::Playing {
        state.phase = SessionPhase::Paused;
        state.pause_started = Some(now.max(state.last_tick));
        log::info!("Paused at {:.0} ms", now);
    }
}

/// Resume, shifting every time-relative field by the paused duration
pub fn resume(state: &mut SessionState, now: Millis) {
    if state.phase != SessionPhase::Paused {
        return;
    }
    let started = state.pause_started.take().unwrap_or(now);
    let paused = (now - started).max(0.0);

    state.total_paused_ms += paused;
    state.last_tick += paused;
    state.spawner.shift(paused);
    state.buffs.shift(paused);
    state.ability.shift(paused);
    state.phase = SessionPhase::Playing;
    log::info!("Resumed after {:.0} ms", paused);
}

/// Player quit. Paused time up to `now` stays excluded from play time.
pub fn exit(state: &mut SessionState, now: Millis) {
    if state.phase.is_over() {
        return;
    }
    if let Some(started) = state.pause_started.take() {
        state.total_paused_ms += (now - started).max(0.0);
    }
    state.phase = SessionPhase::Exited;
    log::info!("Session exited: score={}", state.score);
}

/// Simple autopilot for demos: chase the nearest collectible that is not
/// directly above a hazard, and fire the ability whenever it is ready.
pub fn autopilot_input(state: &SessionState, now: Millis) -> TickInput {
    let player = state.player.pos();
    let danger = |x: f32| {
        state.objects.iter().any(|o| {
            o.kind.is_hazard()
                && (o.pos.x - x).abs() < (o.size + state.player.size) / 2.0
                && o.pos.y < player.y
                && player.y - o.pos.y < 200.0
        })
    };

    let target = state
        .objects
        .iter()
        .filter(|o| !o.kind.is_hazard() && o.pos.y < player.y && !danger(o.pos.x))
        .min_by(|a, b| {
            (player.y - a.pos.y)
                .partial_cmp(&(player.y - b.pos.y))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|o| o.pos.x);

    let target_x = match target {
        Some(x) => x,
        None if danger(player.x) => {
            // Dodge toward the roomier side
            if player.x < state.width / 2.0 {
                player.x + state.player.size * 2.0
            } else {
                player.x - state.player.size * 2.0
            }
        }
        None => player.x,
    };

    // Save the extra life for when it matters
    let activate_ability = state.ability.is_ready(now)
        && (state.ability.kind != AbilityKind::ExtraLife || state.lives == 1);

    TickInput {
        target_x,
        pointer_active: true,
        activate_ability,
    }
}
