//! Star Catch entry point
//!
//! Native builds run a headless demo: one seeded session flown by the
//! autopilot, with audio cues, achievements and progression wired up.
//!
//! Usage: `star-catch [ship-id] [seed] [max-seconds]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use star_catch::audio::AudioManager;
    use star_catch::catalog::ship_by_id;
    use star_catch::consts::FRAME_MS;
    use star_catch::progression::Day;
    use star_catch::session::{FrameSnapshot, PresentationSink};
    use star_catch::sim::{SessionConfig, autopilot_input};
    use star_catch::{Progression, Result, Session, Settings, Tuning};

    /// Logs a HUD line once per second of play
    struct HudLog {
        settings: Settings,
        frames: u64,
    }

    impl PresentationSink for HudLog {
        fn present(&mut self, frame: &FrameSnapshot) {
            self.frames += 1;
            if self.frames % 60 != 0 {
                return;
            }
            let lives = if frame.god_mode {
                "GOD".to_string()
            } else {
                frame.lives.to_string()
            };
            log::debug!(
                "t={}s score={} lives={} objects={} tilt={:.2} ability={:?}{}{}",
                self.frames / 60,
                frame.score,
                lives,
                frame.objects.len(),
                self.settings.effective_tilt(frame.tilt),
                frame.ability.status,
                if frame.multiplier_ms.is_some() { " 2X" } else { "" },
                if frame.shield_ms.is_some() { " SHIELD" } else { "" },
            );
        }
    }

    fn today() -> Day {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        (secs / 86_400) as Day
    }

    pub fn run() -> Result<()> {
        let mut args = std::env::args().skip(1);
        let ship = match args.next() {
            Some(id) => ship_by_id(&id)?,
            None => star_catch::catalog::default_ship(),
        };
        let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
        let max_secs: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

        let tuning = match std::env::var("STAR_CATCH_TUNING") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(_) => Tuning::default(),
        };

        let settings = Settings::default();
        let progression = Rc::new(RefCell::new(Progression::new()));
        if !progression.borrow().is_ship_unlocked(ship) {
            log::warn!("{} is still locked ({}), flying it anyway", ship.name, ship.description);
        }

        let audio = Rc::new(RefCell::new(AudioManager::from_settings(&settings)));
        let config = SessionConfig {
            seed,
            ship,
            streak_days: progression.borrow().streak.count,
            tuning,
            ..Default::default()
        };
        let mut session = Session::new(config, 0.0)
            .with_presentation(HudLog {
                settings: settings.clone(),
                frames: 0,
            })
            .with_settings(&settings)
            .with_feedback(audio.clone())
            .with_achievements(progression.clone());

        let mut frame = 0u64;
        let mut tones = 0usize;
        loop {
            frame += 1;
            let now = frame as f64 * FRAME_MS;
            progression.borrow_mut().poll(now);
            let input = autopilot_input(session.state(), now);
            if session.frame(&input, now).is_over() {
                break;
            }
            audio.borrow_mut().update(now);
            tones += audio.borrow_mut().drain().len();
            if now >= max_secs * 1000.0 {
                session.exit(now);
                break;
            }
        }

        let Some(stats) = session.final_stats() else {
            return Ok(());
        };
        let now = frame as f64 * FRAME_MS;
        let record = progression.borrow_mut().record_session(stats, today(), now);
        log::info!("{} audio tones queued", tones);
        log::info!("Newly unlocked at session end: {:?}", record.newly_unlocked);
        // Platinum armed by the last unlock lands after its delay
        let platinum_due = progression.borrow().platinum_due_at();
        if let Some(due) = platinum_due {
            if let Some(id) = progression.borrow_mut().poll(due) {
                log::info!("Achievement unlocked: {}", id);
            }
        }

        println!("{}", serde_json::to_string_pretty(&record.stats)?);
        println!("{}", progression.borrow().to_json()?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Star Catch (native demo) starting...");
    if let Err(e) = demo::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives `star_catch::Session` directly
}
