//! Achievements
//!
//! Every achievement is a predicate over a `GameStats` snapshot. The
//! evaluator runs the whole table once per frame and reports ids that became
//! true, each at most once per session.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::ItemKind;
use crate::error::{Result, StarCatchError};

/// Running statistics of a session. The final snapshot is the session result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: u64,
    pub items_collected: u32,
    pub consecutive_safe: u32,
    /// Seconds, paused time excluded
    pub time_played: f64,
    /// A hazard cost a life at least once
    pub hit_red: bool,
    /// Daily streak as it stood when the session began
    pub streak_days: u32,
    pub collected_types: Vec<ItemKind>,
}

impl GameStats {
    pub fn has_collected(&self, kind: ItemKind) -> bool {
        self.collected_types.contains(&kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Basic,
    Combo,
    Special,
    Seasonal,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 4] = [
        AchievementCategory::Basic,
        AchievementCategory::Combo,
        AchievementCategory::Special,
        AchievementCategory::Seasonal,
    ];
}

/// A catalog entry (read-only)
#[derive(Debug, Clone, Copy)]
pub struct AchievementDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub condition: fn(&GameStats) -> bool,
}

impl AchievementDefinition {
    pub fn is_met(&self, stats: &GameStats) -> bool {
        (self.condition)(stats)
    }
}

/// Granted by progression once everything else is unlocked
pub const PLATINUM_ID: &str = "platinum_completionist";

pub static ACHIEVEMENTS: &[AchievementDefinition] = &[
    // Basic
    AchievementDefinition {
        id: "score_50",
        title: "Rookie",
        description: "Score 50 points",
        category: AchievementCategory::Basic,
        condition: |s| s.score >= 50,
    },
    AchievementDefinition {
        id: "score_200",
        title: "Experienced",
        description: "Score 200 points",
        category: AchievementCategory::Basic,
        condition: |s| s.score >= 200,
    },
    AchievementDefinition {
        id: "score_500",
        title: "Catcher",
        description: "Score 500 points",
        category: AchievementCategory::Basic,
        condition: |s| s.score >= 500,
    },
    AchievementDefinition {
        id: "score_1000",
        title: "Master",
        description: "Score 1000 points",
        category: AchievementCategory::Basic,
        condition: |s| s.score >= 1000,
    },
    AchievementDefinition {
        id: "score_2000",
        title: "Legend",
        description: "Score 2000 points",
        category: AchievementCategory::Basic,
        condition: |s| s.score >= 2000,
    },
    // Combo. The streak entries only look at the current run, while the
    // no-hit entries also require that no hazard ever landed.
    AchievementDefinition {
        id: "safe_streak_50",
        title: "Safe Streak",
        description: "Collect 50 in a row without damage",
        category: AchievementCategory::Combo,
        condition: |s| s.consecutive_safe >= 50,
    },
    AchievementDefinition {
        id: "super_safe_streak_500",
        title: "Super Streak",
        description: "Collect 500 in a row without damage",
        category: AchievementCategory::Combo,
        condition: |s| s.consecutive_safe >= 500,
    },
    AchievementDefinition {
        id: "ninja_200",
        title: "Ninja",
        description: "Score 200 in one game without a single hit",
        category: AchievementCategory::Combo,
        condition: |s| s.score >= 200 && !s.hit_red,
    },
    AchievementDefinition {
        id: "invincible_500",
        title: "Invincible",
        description: "Score 500 in one game without a single hit",
        category: AchievementCategory::Combo,
        condition: |s| s.score >= 500 && !s.hit_red,
    },
    // Special
    AchievementDefinition {
        id: "iron_nerves_10",
        title: "Iron Nerves",
        description: "Survive for 10 minutes",
        category: AchievementCategory::Special,
        condition: |s| s.time_played >= 600.0,
    },
    AchievementDefinition {
        id: "speed_run_50",
        title: "Speedster",
        description: "Score 50 within 20 seconds",
        category: AchievementCategory::Special,
        condition: |s| s.score >= 50 && s.time_played <= 20.0,
    },
    AchievementDefinition {
        id: "collector_v2",
        title: "Collector",
        description: "Pick up a gold, a multiplier and a shield bonus",
        category: AchievementCategory::Special,
        condition: |s| ItemKind::BONUSES.iter().all(|&k| s.has_collected(k)),
    },
    // Seasonal
    AchievementDefinition {
        id: "streak_3",
        title: "Warm-up",
        description: "Play 3 days in a row",
        category: AchievementCategory::Seasonal,
        condition: |s| s.streak_days >= 3,
    },
    AchievementDefinition {
        id: "streak_7",
        title: "Week Marathon",
        description: "Play 7 days in a row",
        category: AchievementCategory::Seasonal,
        condition: |s| s.streak_days >= 7,
    },
    AchievementDefinition {
        id: "streak_30",
        title: "Month Marathon",
        description: "Play 30 days in a row",
        category: AchievementCategory::Seasonal,
        condition: |s| s.streak_days >= 30,
    },
    // Never true on its own; see `all_but_platinum`
    AchievementDefinition {
        id: PLATINUM_ID,
        title: "Platinum",
        description: "Unlock every other achievement",
        category: AchievementCategory::Special,
        condition: |_| false,
    },
];

pub fn achievement_by_id(id: &str) -> Result<&'static AchievementDefinition> {
    ACHIEVEMENTS
        .iter()
        .find(|a| a.id == id)
        .ok_or_else(|| StarCatchError::UnknownAchievement(id.to_string()))
}

/// Every achievement except platinum
pub fn non_platinum() -> impl Iterator<Item = &'static AchievementDefinition> {
    ACHIEVEMENTS.iter().filter(|a| a.id != PLATINUM_ID)
}

/// True once `unlocked` holds every non-platinum id
pub fn all_but_platinum<S: AsRef<str>>(unlocked: &[S]) -> bool {
    non_platinum().all(|a| unlocked.iter().any(|u| u.as_ref() == a.id))
}

/// Per-session evaluator
#[derive(Debug, Clone, Default)]
pub struct AchievementEvaluator {
    reported: BTreeSet<&'static str>,
}

impl AchievementEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids newly satisfied by `stats`. An id is never returned twice.
    pub fn evaluate(&mut self, stats: &GameStats) -> Vec<&'static str> {
        let mut newly = Vec::new();
        for achievement in non_platinum() {
            if !self.reported.contains(achievement.id) && achievement.is_met(stats) {
                self.reported.insert(achievement.id);
                newly.push(achievement.id);
            }
        }
        newly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn stats() -> GameStats {
        GameStats::default()
    }

    #[test]
    fn test_catalog_ids_unique() {
        let ids: HashSet<_> = ACHIEVEMENTS.iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), ACHIEVEMENTS.len());
        assert_eq!(ACHIEVEMENTS.len(), 16);
        for category in AchievementCategory::ALL {
            assert!(ACHIEVEMENTS.iter().any(|a| a.category == category));
        }
    }

    #[test]
    fn test_score_thresholds() {
        let mut eval = AchievementEvaluator::new();
        let s = GameStats {
            score: 200,
            hit_red: true,
            time_played: 100.0,
            ..stats()
        };
        assert_eq!(eval.evaluate(&s), vec!["score_50", "score_200"]);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let mut eval = AchievementEvaluator::new();
        let s = GameStats {
            score: 600,
            time_played: 30.0,
            ..stats()
        };
        let first = eval.evaluate(&s);
        assert!(first.contains(&"invincible_500"));
        assert!(eval.evaluate(&s).is_empty());
    }

    #[test]
    fn test_no_repeat_after_condition_flickers() {
        let mut eval = AchievementEvaluator::new();
        let mut s = GameStats {
            consecutive_safe: 50,
            time_played: 100.0,
            ..stats()
        };
        assert_eq!(eval.evaluate(&s), vec!["safe_streak_50"]);
        s.consecutive_safe = 0;
        assert!(eval.evaluate(&s).is_empty());
        s.consecutive_safe = 60;
        assert!(eval.evaluate(&s).is_empty());
    }

    #[test]
    fn test_streak_ignores_hit_red_but_ninja_does_not() {
        let s = GameStats {
            score: 250,
            consecutive_safe: 50,
            hit_red: true,
            time_played: 100.0,
            ..stats()
        };
        assert!(achievement_by_id("safe_streak_50").unwrap().is_met(&s));
        assert!(!achievement_by_id("ninja_200").unwrap().is_met(&s));
    }

    #[test]
    fn test_speed_run_window() {
        let speed_run = achievement_by_id("speed_run_50").unwrap();
        let mut s = GameStats {
            score: 50,
            time_played: 20.0,
            ..stats()
        };
        assert!(speed_run.is_met(&s));
        s.time_played = 20.01;
        assert!(!speed_run.is_met(&s));
    }

    #[test]
    fn test_collector_needs_all_three_bonuses() {
        let collector = achievement_by_id("collector_v2").unwrap();
        let mut s = GameStats {
            collected_types: vec![ItemKind::Gold, ItemKind::Multiplier, ItemKind::Hazard],
            ..stats()
        };
        assert!(!collector.is_met(&s));
        s.collected_types.push(ItemKind::Shield);
        assert!(collector.is_met(&s));
    }

    #[test]
    fn test_platinum_never_evaluates() {
        let mut eval = AchievementEvaluator::new();
        let s = GameStats {
            score: 5000,
            consecutive_safe: 600,
            time_played: 700.0,
            streak_days: 40,
            collected_types: ItemKind::ALL.to_vec(),
            ..stats()
        };
        let newly = eval.evaluate(&s);
        assert!(!newly.contains(&PLATINUM_ID));
        // speed_run_50 is the only one out of reach at 700 s
        assert_eq!(newly.len(), ACHIEVEMENTS.len() - 2);
    }

    #[test]
    fn test_all_but_platinum() {
        let mut ids: Vec<&str> = non_platinum().map(|a| a.id).collect();
        assert!(all_but_platinum(&ids));
        ids.pop();
        assert!(!all_but_platinum(&ids));
        assert!(!all_but_platinum::<&str>(&[]));
    }

    #[test]
    fn test_unknown_achievement() {
        assert!(matches!(
            achievement_by_id("score_9000"),
            Err(StarCatchError::UnknownAchievement(_))
        ));
    }
}
