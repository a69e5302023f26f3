//! Sound effect notifications
//!
//! The simulation only raises [`GameEvent`]s. This module maps them to
//! procedural tone descriptions and hands those to whatever backend
//! implements [`AudioSink`]. No external sound files are involved.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player fired
    Shoot,
    /// Bullet hit an enemy
    EnemyHit,
    EnemyKilled,
    /// Player took damage
    PlayerHurt,
    PickupCollect,
    Dash,
    Explosion,
    /// Combo milestone
    Combo,
    BossWarning,
    LevelUp,
    GameOver,
    /// New best record
    NewRecord,
}

/// Oscillator shapes a backend is expected to support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// A single pitch sweep with an exponential decay envelope
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub freq_start: f32,
    pub freq_end: f32,
    /// Seconds
    pub duration: f32,
    /// Peak gain before volume is applied
    pub gain: f32,
}

impl SoundEffect {
    /// Map a simulation event to its sound, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shoot => Some(SoundEffect::Shoot),
            GameEvent::EnemyHit => Some(SoundEffect::EnemyHit),
            GameEvent::EnemyKilled => Some(SoundEffect::EnemyKilled),
            GameEvent::PlayerHurt => Some(SoundEffect::PlayerHurt),
            GameEvent::Pickup => Some(SoundEffect::PickupCollect),
            GameEvent::Dash => Some(SoundEffect::Dash),
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::Combo(_) => Some(SoundEffect::Combo),
            GameEvent::BossSpawned => Some(SoundEffect::BossWarning),
            GameEvent::LevelUp(_) => Some(SoundEffect::LevelUp),
            GameEvent::Death => Some(SoundEffect::GameOver),
            GameEvent::RecordsImproved => Some(SoundEffect::NewRecord),
            GameEvent::RunStarted => None,
        }
    }

    pub fn tone(&self) -> Tone {
        use Waveform::*;
        let (waveform, freq_start, freq_end, duration, gain) = match self {
            // Quiet, it fires several times a second
            SoundEffect::Shoot => (Square, 880.0, 440.0, 0.05, 0.12),
            SoundEffect::EnemyHit => (Triangle, 320.0, 220.0, 0.06, 0.25),
            SoundEffect::EnemyKilled => (Sawtooth, 260.0, 80.0, 0.15, 0.35),
            SoundEffect::PlayerHurt => (Square, 180.0, 90.0, 0.2, 0.5),
            SoundEffect::PickupCollect => (Sine, 660.0, 1320.0, 0.08, 0.3),
            SoundEffect::Dash => (Triangle, 200.0, 600.0, 0.12, 0.3),
            SoundEffect::Explosion => (Sawtooth, 120.0, 30.0, 0.4, 0.6),
            SoundEffect::Combo => (Sine, 520.0, 1040.0, 0.15, 0.35),
            SoundEffect::BossWarning => (Sawtooth, 70.0, 55.0, 0.8, 0.6),
            SoundEffect::LevelUp => (Sine, 440.0, 880.0, 0.4, 0.45),
            SoundEffect::GameOver => (Triangle, 300.0, 60.0, 1.0, 0.5),
            SoundEffect::NewRecord => (Sine, 523.0, 1046.0, 0.6, 0.5),
        };
        Tone {
            waveform,
            freq_start,
            freq_end,
            duration,
            gain,
        }
    }
}

/// Playback backend (Web Audio, a native mixer, or nothing at all)
pub trait AudioSink {
    /// Fire and forget; `volume` is already scaled by the mixer
    fn play_tone(&mut self, effect: SoundEffect, tone: Tone, volume: f32);
}

/// Sink for headless runs: only logs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play_tone(&mut self, effect: SoundEffect, tone: Tone, volume: f32) {
        log::trace!("sfx {:?} {:.0}Hz vol {:.2}", effect, tone.freq_start, volume);
    }
}

/// Volume and mute state in front of a sink
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Muted because the window lost focus
    blurred: bool,
    mute_on_blur: bool,
    /// Effects actually sent to a sink
    played: u64,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            blurred: false,
            mute_on_blur: true,
            played: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.apply_settings(settings);
        audio
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.mute_on_blur = settings.mute_on_blur;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Window focus changed
    pub fn set_focused(&mut self, focused: bool) {
        self.blurred = !focused && self.mute_on_blur;
    }

    pub fn played(&self) -> u64 {
        self.played
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted || self.blurred {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect; returns false when silenced
    pub fn play(&mut self, effect: SoundEffect, sink: &mut dyn AudioSink) -> bool {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return false;
        }
        sink.play_tone(effect, effect.tone(), vol);
        self.played += 1;
        true
    }

    /// Play one tick's worth of events. Repeats of the same effect in a
    /// tick collapse to one sound.
    pub fn dispatch(&mut self, events: &[GameEvent], sink: &mut dyn AudioSink) {
        let mut seen: Vec<SoundEffect> = Vec::with_capacity(events.len());
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            if !seen.contains(&effect) {
                seen.push(effect);
                self.play(effect, sink);
            }
        }
    }
}
