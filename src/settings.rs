//! Player preferences
//!
//! Stored apart from progression. The host owns the actual storage; this type
//! only knows how to turn itself into JSON and back.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Silences everything without touching the volume sliders
    pub muted: bool,

    // === Feedback ===
    /// Forward impact/notification cues to the host's haptic engine
    pub haptics: bool,

    // === Accessibility ===
    /// Reduced motion (no ship tilt, no screen flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            haptics: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective sound effect gain
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.music_volume).clamp(0.0, 1.0)
        }
    }

    /// Ship tilt to present, respecting reduced motion
    pub fn effective_tilt(&self, tilt: f32) -> f32 {
        if self.reduced_motion { 0.0 } else { tilt }
    }

    /// Parse stored settings. Missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings = serde_json::from_str(json)?;
        log::info!("Loaded settings");
        Ok(settings)
    }

    /// Parse stored settings, or use defaults when absent or corrupt
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Discarding unreadable settings: {}", e);
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gains() {
        let mut settings = Settings::default();
        assert!((settings.sfx_gain() - 0.8).abs() < 1e-6);
        assert!((settings.music_gain() - 0.56).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.sfx_gain(), 0.0);
        assert_eq!(settings.music_gain(), 0.0);
    }

    #[test]
    fn test_reduced_motion_flattens_tilt() {
        let mut settings = Settings::default();
        assert_eq!(settings.effective_tilt(0.3), 0.3);
        settings.reduced_motion = true;
        assert_eq!(settings.effective_tilt(0.3), 0.0);
    }

    #[test]
    fn test_json_round_trip_and_partial() {
        let settings = Settings {
            muted: true,
            haptics: false,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);

        let partial = Settings::from_json(r#"{"muted": true}"#).unwrap();
        assert!(partial.muted);
        assert_eq!(partial.master_volume, 0.8);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        assert_eq!(Settings::load_or_default(Some("{not json")), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }
}
