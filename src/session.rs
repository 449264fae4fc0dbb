//! Session driver
//!
//! `Session` owns the simulation state for one play-through, runs one tick per
//! frame and is the only place where simulation events reach the outside
//! world. Collaborators are injected as trait objects; any of them can be a
//! no-op and the simulation behaves identically.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use serde::Serialize;

use crate::Millis;
use crate::achievements::{AchievementEvaluator, GameStats};
use crate::audio::{AudioManager, SoundEffect};
use crate::catalog::{AbilityKind, ItemKind, ShipShape};
use crate::settings::Settings;
use crate::sim::{
    AbilityStatus, BuffKind, GameEvent, SessionConfig, SessionPhase, SessionState, TickInput, tick,
};

/// Receives one drawable snapshot per frame
pub trait PresentationSink {
    fn present(&mut self, frame: &FrameSnapshot);
}

/// Receives sound cues. Fire-and-forget.
pub trait FeedbackSink {
    fn play(&mut self, effect: SoundEffect);

    /// Background music on/off, following play and pause
    fn music(&mut self, _playing: bool, _now: Millis) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationKind {
    Success,
    Warning,
    Error,
}

/// Host haptic engine. Optional: sessions run the same without one.
pub trait HapticSink {
    fn impact(&mut self, style: ImpactStyle);
    fn notify(&mut self, kind: NotificationKind);
}

/// Receives newly unlocked achievement ids. Must tolerate duplicates across sessions.
pub trait AchievementSink {
    fn unlocked(&mut self, id: &'static str);
}

/// Receives the final statistics, exactly once per session
pub trait SessionEndSink {
    fn session_ended(&mut self, outcome: SessionPhase, stats: &GameStats);
}

/// Collaborator that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl PresentationSink for NullSink {
    fn present(&mut self, _frame: &FrameSnapshot) {}
}

impl FeedbackSink for NullSink {
    fn play(&mut self, _effect: SoundEffect) {}
}

impl HapticSink for NullSink {
    fn impact(&mut self, _style: ImpactStyle) {}
    fn notify(&mut self, _kind: NotificationKind) {}
}

impl AchievementSink for NullSink {
    fn unlocked(&mut self, _id: &'static str) {}
}

impl SessionEndSink for NullSink {
    fn session_ended(&mut self, _outcome: SessionPhase, _stats: &GameStats) {}
}

impl FeedbackSink for AudioManager {
    fn play(&mut self, effect: SoundEffect) {
        AudioManager::play(self, effect);
    }

    fn music(&mut self, playing: bool, now: Millis) {
        if playing {
            self.start_bgm(now);
        } else {
            self.stop_bgm();
        }
    }
}

// Shared collaborators, so the host can keep a handle to what it injected.
impl<T: PresentationSink> PresentationSink for Rc<RefCell<T>> {
    fn present(&mut self, frame: &FrameSnapshot) {
        self.borrow_mut().present(frame);
    }
}

impl<T: FeedbackSink> FeedbackSink for Rc<RefCell<T>> {
    fn play(&mut self, effect: SoundEffect) {
        self.borrow_mut().play(effect);
    }

    fn music(&mut self, playing: bool, now: Millis) {
        self.borrow_mut().music(playing, now);
    }
}

impl<T: HapticSink> HapticSink for Rc<RefCell<T>> {
    fn impact(&mut self, style: ImpactStyle) {
        self.borrow_mut().impact(style);
    }

    fn notify(&mut self, kind: NotificationKind) {
        self.borrow_mut().notify(kind);
    }
}

impl<T: AchievementSink> AchievementSink for Rc<RefCell<T>> {
    fn unlocked(&mut self, id: &'static str) {
        self.borrow_mut().unlocked(id);
    }
}

impl<T: SessionEndSink> SessionEndSink for Rc<RefCell<T>> {
    fn session_ended(&mut self, outcome: SessionPhase, stats: &GameStats) {
        self.borrow_mut().session_ended(outcome, stats);
    }
}

/// A falling object as drawn
#[derive(Debug, Clone, Serialize)]
pub struct ObjectView {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub size: f32,
}

/// Ability indicator
#[derive(Debug, Clone, Serialize)]
pub struct AbilityView {
    pub kind: AbilityKind,
    pub status: AbilityStatus,
    pub cooldown_remaining_ms: Millis,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub lives: u32,
    /// Hazards never cost lives (HUD shows "GOD" instead of hearts)
    pub god_mode: bool,
    pub player: Vec2,
    pub player_size: f32,
    /// Bank angle in radians
    pub tilt: f32,
    pub ship_color: &'static str,
    pub ship_shape: ShipShape,
    pub clones: Option<[Vec2; 2]>,
    pub objects: Vec<ObjectView>,
    pub projectiles: Vec<Vec2>,
    /// Remaining buff time, if active
    pub multiplier_ms: Option<Millis>,
    pub shield_ms: Option<Millis>,
    pub ability: AbilityView,
}

impl FrameSnapshot {
    pub fn capture(state: &SessionState, now: Millis) -> Self {
        Self {
            phase: state.phase,
            score: state.score,
            lives: state.lives,
            god_mode: state.god_mode,
            player: state.player.pos(),
            player_size: state.player.size,
            tilt: state.player.tilt(),
            ship_color: state.ship.color,
            ship_shape: state.ship.shape,
            clones: state.clone_positions(now),
            objects: state
                .objects
                .iter()
                .map(|o| ObjectView {
                    kind: o.kind,
                    pos: o.pos,
                    size: o.size,
                })
                .collect(),
            projectiles: state.projectiles.iter().map(|p| p.pos).collect(),
            multiplier_ms: state.buffs.remaining(BuffKind::ScoreMultiplier, now),
            shield_ms: state.buffs.remaining(BuffKind::Shield, now),
            ability: AbilityView {
                kind: state.ability.kind,
                status: state.ability.status(now),
                cooldown_remaining_ms: state.ability.cooldown_remaining(now),
            },
        }
    }
}

/// One play-through from start to loss or exit
pub struct Session {
    state: SessionState,
    evaluator: AchievementEvaluator,
    presentation: Box<dyn PresentationSink>,
    feedback: Box<dyn FeedbackSink>,
    haptics: Option<Box<dyn HapticSink>>,
    /// Player preference; when off, no cue reaches the haptic sink
    haptics_enabled: bool,
    achievements: Box<dyn AchievementSink>,
    end: Box<dyn SessionEndSink>,
    music_on: bool,
    final_stats: Option<GameStats>,
}

impl Session {
    pub fn new(config: SessionConfig, now: Millis) -> Self {
        log::info!(
            "Session start: ship={} ability={} seed={} god_mode={}",
            config.ship.id,
            config.ship.ability.label(),
            config.seed,
            config.god_mode
        );
        Self {
            state: SessionState::new(config, now),
            evaluator: AchievementEvaluator::new(),
            presentation: Box::new(NullSink),
            feedback: Box::new(NullSink),
            haptics: None,
            haptics_enabled: true,
            achievements: Box::new(NullSink),
            end: Box::new(NullSink),
            music_on: false,
            final_stats: None,
        }
    }

    pub fn with_presentation(mut self, sink: impl PresentationSink + 'static) -> Self {
        self.presentation = Box::new(sink);
        self
    }

    pub fn with_feedback(mut self, sink: impl FeedbackSink + 'static) -> Self {
        self.feedback = Box::new(sink);
        self
    }

    pub fn with_haptics(mut self, sink: impl HapticSink + 'static) -> Self {
        self.haptics = Some(Box::new(sink));
        self
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.apply_settings(settings);
        self
    }

    /// Settings can change mid-session from the pause menu
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.haptics_enabled = settings.haptics;
    }

    pub fn with_achievements(mut self, sink: impl AchievementSink + 'static) -> Self {
        self.achievements = Box::new(sink);
        self
    }

    pub fn with_end_sink(mut self, sink: impl SessionEndSink + 'static) -> Self {
        self.end = Box::new(sink);
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Set once the session has been finalized
    pub fn final_stats(&self) -> Option<&GameStats> {
        self.final_stats.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.final_stats.is_some()
    }

    pub fn snapshot(&self, now: Millis) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state, now)
    }

    /// Run one frame. Does nothing unless the session is playing.
    pub fn frame(&mut self, input: &TickInput, now: Millis) -> SessionPhase {
        if self.state.phase != SessionPhase::Playing {
            return self.state.phase;
        }
        if !self.music_on {
            self.music_on = true;
            self.feedback.music(true, now);
        }

        tick(&mut self.state, input, now);

        for event in self.state.drain_events() {
            self.route(event);
        }

        let stats = self.state.stats(now);
        for id in self.evaluator.evaluate(&stats) {
            log::info!("Achievement unlocked: {}", id);
            self.achievements.unlocked(id);
            self.notify(NotificationKind::Success);
        }

        let snapshot = FrameSnapshot::capture(&self.state, now);
        self.presentation.present(&snapshot);

        if self.state.phase == SessionPhase::Lost {
            self.finish(now);
        }
        self.state.phase
    }

    pub fn pause(&mut self, now: Millis) {
        if self.state.phase != SessionPhase::Playing {
            return;
        }
        crate::sim::pause(&mut self.state, now);
        self.set_music(false, now);
    }

    pub fn resume(&mut self, now: Millis) {
        if self.state.phase != SessionPhase::Paused {
            return;
        }
        crate::sim::resume(&mut self.state, now);
        self.set_music(true, now);
    }

    /// Player quit. Finalizes immediately; later calls are no-ops.
    pub fn exit(&mut self, now: Millis) {
        if self.state.phase.is_over() {
            return;
        }
        crate::sim::exit(&mut self.state, now);
        self.finish(now);
    }

    fn set_music(&mut self, playing: bool, now: Millis) {
        if self.music_on != playing {
            self.music_on = playing;
            self.feedback.music(playing, now);
        }
    }

    fn haptic_sink(&mut self) -> Option<&mut Box<dyn HapticSink>> {
        if self.haptics_enabled { self.haptics.as_mut() } else { None }
    }

    fn impact(&mut self, style: ImpactStyle) {
        if let Some(haptics) = self.haptic_sink() {
            haptics.impact(style);
        }
    }

    fn notify(&mut self, kind: NotificationKind) {
        if let Some(haptics) = self.haptic_sink() {
            haptics.notify(kind);
        }
    }

    fn route(&mut self, event: GameEvent) {
        match event {
            GameEvent::Collected => {
                self.feedback.play(SoundEffect::PickupGood);
                self.impact(ImpactStyle::Light);
            }
            GameEvent::BonusCollected(kind) => {
                self.feedback.play(SoundEffect::Bonus(kind));
                self.impact(ImpactStyle::Light);
            }
            GameEvent::Damaged => {
                self.feedback.play(SoundEffect::PickupBad);
                self.impact(ImpactStyle::Heavy);
            }
            GameEvent::Blocked | GameEvent::Intercepted => {
                self.feedback.play(SoundEffect::Blocked);
            }
            GameEvent::AbilityUsed(kind) => {
                self.feedback.play(SoundEffect::AbilityUsed(kind));
                self.impact(ImpactStyle::Medium);
            }
            GameEvent::HazardShot | GameEvent::HazardsCleared(_) | GameEvent::LifeGranted => {}
            GameEvent::SessionLost => {
                self.feedback.play(SoundEffect::GameOver);
                self.notify(NotificationKind::Error);
            }
        }
    }

    fn finish(&mut self, now: Millis) {
        if self.final_stats.is_some() {
            return;
        }
        self.set_music(false, now);
        let stats = self.state.stats(now);
        log::info!(
            "Session end ({:?}): score={} items={} time={:.1}s",
            self.state.phase,
            stats.score,
            stats.items_collected,
            stats.time_played
        );
        self.end.session_ended(self.state.phase, &stats);
        self.final_stats = Some(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::sim::FallingObject;

    #[derive(Default)]
    struct Recorder {
        sounds: Vec<SoundEffect>,
        music: Vec<bool>,
        impacts: Vec<ImpactStyle>,
        notifications: Vec<NotificationKind>,
        unlocked: Vec<&'static str>,
        endings: Vec<(SessionPhase, GameStats)>,
        frames: usize,
    }

    impl PresentationSink for Recorder {
        fn present(&mut self, _frame: &FrameSnapshot) {
            self.frames += 1;
        }
    }

    impl FeedbackSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.sounds.push(effect);
        }

        fn music(&mut self, playing: bool, _now: Millis) {
            self.music.push(playing);
        }
    }

    impl HapticSink for Recorder {
        fn impact(&mut self, style: ImpactStyle) {
            self.impacts.push(style);
        }

        fn notify(&mut self, kind: NotificationKind) {
            self.notifications.push(kind);
        }
    }

    impl AchievementSink for Recorder {
        fn unlocked(&mut self, id: &'static str) {
            self.unlocked.push(id);
        }
    }

    impl SessionEndSink for Recorder {
        fn session_ended(&mut self, outcome: SessionPhase, stats: &GameStats) {
            self.endings.push((outcome, stats.clone()));
        }
    }

    fn session(config: SessionConfig) -> (Session, Rc<RefCell<Recorder>>) {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let session = Session::new(config, 0.0)
            .with_presentation(rec.clone())
            .with_feedback(rec.clone())
            .with_haptics(rec.clone())
            .with_achievements(rec.clone())
            .with_end_sink(rec.clone());
        (session, rec)
    }

    fn drop_on_player(session: &mut Session, kind: ItemKind) {
        let pos = session.state.player.pos();
        let id = session.state.next_entity_id();
        session.state.objects.push(FallingObject {
            id,
            pos,
            kind,
            size: 30.0,
        });
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_loss_finalizes_exactly_once() {
        let (mut session, rec) = session(SessionConfig::default());
        session.state.lives = 1;
        drop_on_player(&mut session, ItemKind::Hazard);

        assert_eq!(session.frame(&idle(), FRAME_MS), SessionPhase::Lost);
        assert!(session.is_finished());

        // Nothing after the end
        session.frame(&idle(), FRAME_MS * 2.0);
        session.exit(FRAME_MS * 3.0);

        let rec = rec.borrow();
        assert_eq!(rec.endings.len(), 1);
        assert_eq!(rec.endings[0].0, SessionPhase::Lost);
        assert!(rec.endings[0].1.hit_red);
        assert_eq!(rec.frames, 1);
        assert!(rec.sounds.contains(&SoundEffect::PickupBad));
        assert_eq!(rec.sounds.last(), Some(&SoundEffect::GameOver));
        assert_eq!(rec.impacts, vec![ImpactStyle::Heavy]);
        assert!(rec.notifications.contains(&NotificationKind::Error));
        assert_eq!(rec.music, vec![true, false]);
    }

    #[test]
    fn test_exit_finalizes_once_with_play_time() {
        let (mut session, rec) = session(SessionConfig::default());
        for i in 1..=60 {
            session.frame(&idle(), i as f64 * FRAME_MS);
        }
        session.exit(1000.0);
        session.exit(2000.0);

        assert_eq!(session.phase(), SessionPhase::Exited);
        let rec = rec.borrow();
        assert_eq!(rec.endings.len(), 1);
        assert_eq!(rec.endings[0].0, SessionPhase::Exited);
        assert!((rec.endings[0].1.time_played - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_achievement_reported_once() {
        let (mut session, rec) = session(SessionConfig::default());
        session.state.score = 49;
        drop_on_player(&mut session, ItemKind::Common);
        session.frame(&idle(), FRAME_MS);
        for i in 2..30 {
            session.frame(&idle(), i as f64 * FRAME_MS);
        }

        let rec = rec.borrow();
        let score_50 = rec.unlocked.iter().filter(|&&id| id == "score_50").count();
        assert_eq!(score_50, 1);
        // Scored 50 within 20 seconds as well
        assert!(rec.unlocked.contains(&"speed_run_50"));
        assert!(rec.notifications.contains(&NotificationKind::Success));
        assert!(rec.sounds.contains(&SoundEffect::PickupGood));
    }

    #[test]
    fn test_shield_block_is_distinct_feedback() {
        let (mut session, rec) = session(SessionConfig::default());
        drop_on_player(&mut session, ItemKind::Shield);
        session.frame(&idle(), FRAME_MS);
        drop_on_player(&mut session, ItemKind::Hazard);
        session.frame(&idle(), FRAME_MS * 2.0);

        assert_eq!(session.state().lives, 3);
        let rec = rec.borrow();
        assert_eq!(
            rec.sounds,
            vec![SoundEffect::Bonus(ItemKind::Shield), SoundEffect::Blocked]
        );
        assert_eq!(rec.impacts, vec![ImpactStyle::Light]);
    }

    #[test]
    fn test_paused_frames_do_nothing() {
        let (mut session, rec) = session(SessionConfig::default());
        session.frame(&idle(), FRAME_MS);
        session.pause(FRAME_MS);
        let ticks = session.state().time_ticks;
        assert_eq!(session.frame(&idle(), 5000.0), SessionPhase::Paused);
        assert_eq!(session.state().time_ticks, ticks);

        session.resume(10_000.0);
        session.frame(&idle(), 10_000.0 + FRAME_MS);
        assert_eq!(session.state().time_ticks, ticks + 1);
        assert_eq!(rec.borrow().music, vec![true, false, true]);
    }

    #[test]
    fn test_runs_without_haptics() {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let mut session = Session::new(SessionConfig::default(), 0.0).with_feedback(rec.clone());
        drop_on_player(&mut session, ItemKind::Common);
        session.frame(&idle(), FRAME_MS);
        assert_eq!(session.state().score, 1);
        assert_eq!(rec.borrow().sounds, vec![SoundEffect::PickupGood]);
    }

    #[test]
    fn test_haptics_setting_silences_sink() {
        let (session, rec) = session(SessionConfig::default());
        let settings = Settings {
            haptics: false,
            ..Default::default()
        };
        let mut session = session.with_settings(&settings);
        session.state.score = 49;
        session.state.lives = 1;
        drop_on_player(&mut session, ItemKind::Common);
        session.frame(&idle(), FRAME_MS);
        drop_on_player(&mut session, ItemKind::Hazard);
        session.frame(&idle(), FRAME_MS * 2.0);

        let rec = rec.borrow();
        assert!(rec.unlocked.contains(&"score_50"));
        assert!(rec.sounds.contains(&SoundEffect::GameOver));
        assert!(rec.impacts.is_empty());
        assert!(rec.notifications.is_empty());
    }

    #[test]
    fn test_haptics_follow_settings_mid_session() {
        let (mut session, rec) = session(SessionConfig::default());
        let mut settings = Settings::default();
        settings.haptics = false;
        session.apply_settings(&settings);
        drop_on_player(&mut session, ItemKind::Common);
        session.frame(&idle(), FRAME_MS);
        assert!(rec.borrow().impacts.is_empty());

        settings.haptics = true;
        session.apply_settings(&settings);
        drop_on_player(&mut session, ItemKind::Common);
        session.frame(&idle(), FRAME_MS * 2.0);
        assert_eq!(rec.borrow().impacts, vec![ImpactStyle::Light]);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (mut session, _rec) = session(SessionConfig::default());
        drop_on_player(&mut session, ItemKind::Multiplier);
        session.frame(&idle(), 100.0);

        let snap = session.snapshot(1100.0);
        assert_eq!(snap.lives, 3);
        assert_eq!(snap.player, Vec2::new(200.0, 640.0));
        assert_eq!(snap.multiplier_ms, Some(4000.0));
        assert_eq!(snap.shield_ms, None);
        assert_eq!(snap.ability.status, AbilityStatus::Unavailable);
        assert!(snap.clones.is_none());
    }
}
