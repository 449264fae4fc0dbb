//! Difficulty and handling curves
//!
//! Both grow with session-relative play time (pauses excluded) and score,
//! so neither can go down within a session.

use crate::tuning::Tuning;

/// `1 + elapsed * time_coefficient + score * score_coefficient`
pub fn difficulty(elapsed_secs: f32, score: u64, tuning: &Tuning) -> f32 {
    1.0 + elapsed_secs.max(0.0) * tuning.time_coefficient + score as f32 * tuning.score_coefficient
}

/// Fraction of the remaining distance the ship covers per tick
pub fn player_lerp(elapsed_secs: f32, score: u64, boosted: bool, tuning: &Tuning) -> f32 {
    let base = tuning.base_lerp
        + elapsed_secs.max(0.0) * tuning.lerp_time_growth
        + score as f32 * tuning.lerp_score_growth;
    if boosted {
        (base * tuning.boost_lerp_multiplier).min(tuning.boost_lerp_cap)
    } else {
        base.min(tuning.lerp_cap)
    }
}

/// Probability of a regular spawn this tick
pub fn spawn_chance(difficulty: f32, time_scale: f32, tuning: &Tuning) -> f64 {
    ((difficulty / tuning.spawn_rate) * time_scale).clamp(0.0, 1.0) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_difficulty_scenarios() {
        let tuning = Tuning::default();
        assert_eq!(difficulty(0.0, 0, &tuning), 1.0);
        assert!((difficulty(100.0, 200, &tuning) - 2.8).abs() < 1e-5);
    }

    #[test]
    fn test_lerp_caps() {
        let tuning = Tuning::default();
        assert!((player_lerp(0.0, 0, false, &tuning) - 0.2).abs() < 1e-6);
        assert!((player_lerp(0.0, 0, true, &tuning) - 0.4).abs() < 1e-6);
        assert_eq!(player_lerp(10_000.0, 10_000, false, &tuning), tuning.lerp_cap);
        assert_eq!(player_lerp(10_000.0, 10_000, true, &tuning), tuning.boost_lerp_cap);
    }

    #[test]
    fn test_spawn_chance_scales_and_clamps() {
        let tuning = Tuning::default();
        let base = spawn_chance(1.0, 1.0, &tuning);
        assert!((base - 1.0 / 15.0).abs() < 1e-6);
        assert!((spawn_chance(2.0, 1.0, &tuning) - 2.0 * base).abs() < 1e-6);
        assert!((spawn_chance(2.0, 0.5, &tuning) - base).abs() < 1e-6);
        assert_eq!(spawn_chance(100.0, 1.0, &tuning), 1.0);
    }

    proptest! {
        #[test]
        fn difficulty_never_decreases(
            t0 in 0.0f32..10_000.0,
            dt in 0.0f32..1_000.0,
            s0 in 0u64..100_000,
            ds in 0u64..1_000,
        ) {
            let tuning = Tuning::default();
            let before = difficulty(t0, s0, &tuning);
            let after = difficulty(t0 + dt, s0 + ds, &tuning);
            prop_assert!(after >= before);
            prop_assert!(before >= 1.0);
        }
    }
}
