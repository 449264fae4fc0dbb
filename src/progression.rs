//! Player progression
//!
//! Everything that outlives a session: high score, unlocked achievements,
//! daily streak, share count and ship selection. The host persists it as
//! JSON wherever it likes.

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::achievements::{
    ACHIEVEMENTS, GameStats, PLATINUM_ID, achievement_by_id, all_but_platinum, non_platinum,
};
use crate::catalog::{DEFAULT_SHIP_ID, ShipDefinition, UnlockRequirement, default_ship, ship_by_id};
use crate::consts::{PLATINUM_DELAY_MS, STREAK_MIN_SCORE};
use crate::error::Result;
use crate::session::AchievementSink;

/// Calendar day index supplied by the host (days since any fixed epoch)
pub type Day = i64;

/// Consecutive days with a qualifying session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyStreak {
    pub last_day: Option<Day>,
    pub count: u32,
}

impl DailyStreak {
    /// Count `today`. Returns the new count, or None if today was already counted.
    pub fn advance(&mut self, today: Day) -> Option<u32> {
        match self.last_day {
            Some(day) if day == today => return None,
            Some(day) if day == today - 1 => self.count += 1,
            _ => self.count = 1,
        }
        self.last_day = Some(today);
        Some(self.count)
    }
}

/// Outcome of recording a finished session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// Final stats with the streak as updated by this session
    pub stats: GameStats,
    pub new_high_score: bool,
    pub newly_unlocked: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progression {
    pub high_score: u64,
    /// Unlock order is kept
    pub unlocked: Vec<String>,
    pub streak: DailyStreak,
    pub shares: u32,
    pub selected_ship: String,
    /// Platinum announcement waiting on its delay
    #[serde(skip)]
    platinum_due: Option<Millis>,
    /// Last time seen by `poll`
    #[serde(skip)]
    clock: Millis,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            high_score: 0,
            unlocked: Vec::new(),
            streak: DailyStreak::default(),
            shares: 0,
            selected_ship: DEFAULT_SHIP_ID.to_string(),
            platinum_due: None,
            clock: 0.0,
        }
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let progression: Progression = serde_json::from_str(json)?;
        log::info!(
            "Loaded progression: high score {}, {} achievements",
            progression.high_score,
            progression.unlocked.len()
        );
        Ok(progression)
    }

    /// Stored progression, or a fresh one when absent or corrupt
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(progression)) => progression,
            Some(Err(e)) => {
                log::warn!("Discarding unreadable progression: {}", e);
                Self::new()
            }
            None => {
                log::info!("No progression found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.iter().any(|u| u == id)
    }

    /// (unlocked, total)
    pub fn achievement_progress(&self) -> (usize, usize) {
        let known = ACHIEVEMENTS.iter().filter(|a| self.is_unlocked(a.id)).count();
        (known, ACHIEVEMENTS.len())
    }

    /// Unlock an achievement. Returns false if it was already unlocked.
    ///
    /// Completing every other achievement schedules platinum
    /// `PLATINUM_DELAY_MS` after `now`; `poll` delivers it.
    pub fn unlock(&mut self, id: &str, now: Millis) -> Result<bool> {
        let achievement = achievement_by_id(id)?;
        if self.is_unlocked(achievement.id) {
            return Ok(false);
        }
        self.unlocked.push(achievement.id.to_string());
        log::info!("Unlocked {} ({})", achievement.id, achievement.title);

        if achievement.id != PLATINUM_ID
            && self.platinum_due.is_none()
            && !self.is_unlocked(PLATINUM_ID)
            && all_but_platinum(&self.unlocked)
        {
            let due = now + PLATINUM_DELAY_MS;
            log::info!("All achievements unlocked, platinum at {:.0} ms", due);
            self.platinum_due = Some(due);
        }
        Ok(true)
    }

    pub fn platinum_pending(&self) -> bool {
        self.platinum_due.is_some()
    }

    /// When a pending platinum becomes deliverable
    pub fn platinum_due_at(&self) -> Option<Millis> {
        self.platinum_due
    }

    /// Advance the clock. Returns platinum once its delay has passed.
    pub fn poll(&mut self, now: Millis) -> Option<&'static str> {
        self.clock = now;
        let due = self.platinum_due?;
        if now < due {
            return None;
        }
        self.platinum_due = None;
        match self.unlock(PLATINUM_ID, now) {
            Ok(true) => Some(PLATINUM_ID),
            _ => None,
        }
    }

    /// Count today toward the daily streak if the session scored enough
    pub fn update_streak(&mut self, score: u64, today: Day) -> Option<u32> {
        if score < STREAK_MIN_SCORE {
            return None;
        }
        let count = self.streak.advance(today)?;
        log::info!("Daily streak: {} day(s)", count);
        Some(count)
    }

    /// Apply a finished session: high score, streak, then every achievement
    /// the final stats satisfy.
    pub fn record_session(&mut self, stats: &GameStats, today: Day, now: Millis) -> SessionRecord {
        let new_high_score = stats.score > self.high_score;
        if new_high_score {
            log::info!("New high score: {}", stats.score);
            self.high_score = stats.score;
        }

        let streak_days = self
            .update_streak(stats.score, today)
            .unwrap_or(self.streak.count);
        let stats = GameStats {
            streak_days,
            ..stats.clone()
        };

        let satisfied: Vec<&'static str> = non_platinum()
            .filter(|a| a.is_met(&stats))
            .map(|a| a.id)
            .collect();
        let mut newly_unlocked = Vec::new();
        for id in satisfied {
            if let Ok(true) = self.unlock(id, now) {
                newly_unlocked.push(id);
            }
        }

        SessionRecord {
            stats,
            new_high_score,
            newly_unlocked,
        }
    }

    /// Returns the new share count
    pub fn record_share(&mut self) -> u32 {
        self.shares += 1;
        self.shares
    }

    pub fn is_ship_unlocked(&self, ship: &ShipDefinition) -> bool {
        match ship.unlock {
            UnlockRequirement::Free => true,
            UnlockRequirement::Achievement(id) => self.is_unlocked(id),
            UnlockRequirement::Shares(n) => self.shares >= n,
        }
    }

    /// Select a ship. Returns false (and keeps the current one) if it is locked.
    pub fn select_ship(&mut self, id: &str) -> Result<bool> {
        let ship = ship_by_id(id)?;
        if !self.is_ship_unlocked(ship) {
            return Ok(false);
        }
        log::info!("Selected ship: {}", ship.name);
        self.selected_ship = ship.id.to_string();
        Ok(true)
    }

    /// The selected ship, falling back to the default if it is unknown or locked
    pub fn selected_ship(&self) -> &'static ShipDefinition {
        match ship_by_id(&self.selected_ship) {
            Ok(ship) if self.is_ship_unlocked(ship) => ship,
            _ => {
                log::warn!("Stored ship '{}' unavailable, using default", self.selected_ship);
                default_ship()
            }
        }
    }
}

impl AchievementSink for Progression {
    fn unlocked(&mut self, id: &'static str) {
        if let Err(e) = self.unlock(id, self.clock) {
            log::warn!("{}", e);
        }
    }
}
