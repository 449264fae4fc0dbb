//! Procedural audio cues
//!
//! Sounds are described as short oscillator tones; the host synthesizes
//! them. No external files needed. `AudioManager` applies volume and mute,
//! queues cues for the host and steps the background music loop.

use serde::Serialize;

use crate::Millis;
use crate::catalog::{AbilityKind, ItemKind};
use crate::settings::Settings;

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator note with an exponential fade-out
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tone {
    pub freq: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
    /// Peak gain before the fade
    pub volume: f32,
    /// Exponential frequency slide over the note
    pub slide_to: Option<f32>,
    /// Seconds after the cue starts
    pub delay: f32,
}

impl Tone {
    const fn new(freq: f32, waveform: Waveform, duration: f32, volume: f32) -> Self {
        Self {
            freq,
            waveform,
            duration,
            volume,
            slide_to: None,
            delay: 0.0,
        }
    }

    const fn slide(mut self, to: f32) -> Self {
        self.slide_to = Some(to);
        self
    }

    const fn after(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Common item caught
    PickupGood,
    /// Hazard hit the ship
    PickupBad,
    /// Hazard absorbed by a shield, phase or clone
    Blocked,
    Bonus(ItemKind),
    AbilityUsed(AbilityKind),
    GameOver,
}

impl SoundEffect {
    /// Tones at full volume
    pub fn tones(self) -> Vec<Tone> {
        use Waveform::*;
        match self {
            // Coin
            SoundEffect::PickupGood => vec![Tone::new(600.0, Sine, 0.1, 0.1).slide(1200.0)],
            // Damage
            SoundEffect::PickupBad => vec![Tone::new(150.0, Sawtooth, 0.3, 0.2).slide(50.0)],
            SoundEffect::Blocked => vec![Tone::new(300.0, Triangle, 0.15, 0.1).slide(150.0)],
            // Ding-ding
            SoundEffect::Bonus(ItemKind::Gold) => vec![
                Tone::new(1200.0, Sine, 0.3, 0.1),
                Tone::new(1600.0, Sine, 0.4, 0.1).after(0.1),
            ],
            // Warp down
            SoundEffect::Bonus(ItemKind::Multiplier) => {
                vec![Tone::new(800.0, Triangle, 0.5, 0.1).slide(200.0)]
            }
            // Low hum rising
            SoundEffect::Bonus(ItemKind::Shield) => {
                vec![Tone::new(220.0, Sine, 0.5, 0.1).slide(880.0)]
            }
            SoundEffect::Bonus(_) => vec![Tone::new(600.0, Sine, 0.1, 0.1)],
            SoundEffect::AbilityUsed(AbilityKind::None) => Vec::new(),
            // Power-up arpeggio
            SoundEffect::AbilityUsed(_) => vec![
                Tone::new(440.0, Square, 0.1, 0.05),
                Tone::new(554.0, Square, 0.1, 0.05).after(0.1),
                Tone::new(659.0, Square, 0.2, 0.05).after(0.2),
            ],
            // Sad descending
            SoundEffect::GameOver => [400.0, 350.0, 300.0, 200.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::new(f, Sine, 0.3, 0.3).after(i as f32 * 0.2))
                .collect(),
        }
    }
}

/// Background loop: C minor pentatonic melody, bass on every other step
const MELODY: [f32; 16] = [
    261.63, 0.0, 311.13, 0.0, // C4, Eb4
    392.00, 0.0, 311.13, 0.0, // G4, Eb4
    261.63, 261.63, 466.16, 0.0, // C4, C4, Bb4
    392.00, 0.0, 523.25, 0.0, // G4, C5
];
const BASS: [f32; 8] = [65.41, 65.41, 77.78, 77.78, 98.00, 98.00, 77.78, 77.78];
/// ms per step
pub const BGM_STEP_MS: Millis = 250.0;

/// Step sequencer for the music loop
#[derive(Debug, Clone)]
pub struct Sequencer {
    step: usize,
    next_step_at: Millis,
}

impl Sequencer {
    pub fn new(now: Millis) -> Self {
        Self {
            step: 0,
            next_step_at: now,
        }
    }

    /// Notes for every step that came due by `now`
    pub fn advance(&mut self, now: Millis) -> Vec<Tone> {
        let mut tones = Vec::new();
        while now >= self.next_step_at {
            let note = MELODY[self.step % MELODY.len()];
            if note > 0.0 {
                tones.push(Tone::new(note, Waveform::Sine, 0.3, 0.05));
            }
            if self.step % 2 == 0 {
                let bass = BASS[(self.step / 2) % BASS.len()];
                tones.push(Tone::new(bass, Waveform::Triangle, 0.4, 0.05));
            }
            self.step += 1;
            self.next_step_at += BGM_STEP_MS;
        }
        tones
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    settings: Settings,
    bgm: Option<Sequencer>,
    /// Cues waiting for the host
    queue: Vec<Tone>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioManager {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            bgm: None,
            queue: Vec::new(),
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.settings = settings.clone();
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    /// Queue a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.settings.sfx_gain();
        if vol <= 0.0 {
            return;
        }
        self.queue.extend(effect.tones().into_iter().map(|t| Tone {
            volume: t.volume * vol,
            ..t
        }));
    }

    pub fn start_bgm(&mut self, now: Millis) {
        if self.bgm.is_none() {
            log::debug!("Music started");
            self.bgm = Some(Sequencer::new(now));
        }
    }

    pub fn stop_bgm(&mut self) {
        if self.bgm.take().is_some() {
            log::debug!("Music stopped");
        }
    }

    pub fn is_bgm_playing(&self) -> bool {
        self.bgm.is_some()
    }

    /// Queue music notes that came due. Muted steps still advance.
    pub fn update(&mut self, now: Millis) {
        let vol = self.settings.music_gain();
        let Some(bgm) = self.bgm.as_mut() else { return };
        let notes = bgm.advance(now);
        if vol > 0.0 {
            self.queue.extend(notes.into_iter().map(|t| Tone {
                volume: t.volume * vol,
                ..t
            }));
        }
    }

    /// Hand queued tones to the synthesizer
    pub fn drain(&mut self) -> Vec<Tone> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_effect_has_tones() {
        let effects = [
            SoundEffect::PickupGood,
            SoundEffect::PickupBad,
            SoundEffect::Blocked,
            SoundEffect::Bonus(ItemKind::Gold),
            SoundEffect::Bonus(ItemKind::Multiplier),
            SoundEffect::Bonus(ItemKind::Shield),
            SoundEffect::AbilityUsed(AbilityKind::Shooter),
            SoundEffect::GameOver,
        ];
        for effect in effects {
            assert!(!effect.tones().is_empty(), "{effect:?}");
        }
        assert!(SoundEffect::AbilityUsed(AbilityKind::None).tones().is_empty());
    }

    #[test]
    fn test_volume_scaling_and_mute() {
        let mut audio = AudioManager::default();
        audio.play(SoundEffect::PickupGood);
        let tones = audio.drain();
        assert_eq!(tones.len(), 1);
        assert!((tones[0].volume - 0.1 * 0.8).abs() < 1e-6);
        assert_eq!(tones[0].slide_to, Some(1200.0));

        audio.set_muted(true);
        audio.play(SoundEffect::GameOver);
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_settings_drive_gain() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.4,
            ..Default::default()
        };
        let mut audio = AudioManager::from_settings(&settings);
        audio.start_bgm(0.0);
        audio.update(0.0);
        let notes = audio.drain();
        assert!((notes[0].volume - 0.05 * settings.music_gain()).abs() < 1e-6);

        audio.apply_settings(&Settings {
            muted: true,
            ..settings
        });
        audio.play(SoundEffect::PickupGood);
        audio.update(1000.0);
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_sequencer_steps() {
        let mut seq = Sequencer::new(0.0);
        // Step 0: C4 + bass C2
        let first = seq.advance(0.0);
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].freq, 261.63);
        assert_eq!(first[1].freq, 65.41);
        // Step 1 is a rest without bass
        assert!(seq.advance(250.0).is_empty());
        // Not due yet
        assert!(seq.advance(400.0).is_empty());
        // Catch up over several steps at once
        let burst = seq.advance(1000.0);
        assert_eq!(burst.len(), 4); // step 2: Eb4 + bass, step 3: rest, step 4: G4 + bass
        assert_eq!(burst[0].freq, 311.13);
    }

    #[test]
    fn test_bgm_start_stop() {
        let mut audio = AudioManager::default();
        audio.update(0.0);
        assert!(audio.drain().is_empty());

        audio.start_bgm(0.0);
        audio.update(0.0);
        assert!(!audio.drain().is_empty());
        audio.stop_bgm();
        assert!(!audio.is_bgm_playing());
        audio.update(10_000.0);
        assert!(audio.drain().is_empty());
    }
}
