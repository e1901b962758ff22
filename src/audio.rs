//! Audio boundary
//!
//! The simulation fires cues through `AudioSink` and never waits on them.
//! Sinks return nothing, so a broken or missing audio backend cannot affect
//! game state.

use serde::{Deserialize, Serialize};

/// Sound effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Fruit eaten (also once per fruit pulled in by a magnet)
    CatchFruit,
    /// Bomb hit without a shield
    Explode,
    /// Potion
    Heal,
    /// Poison
    Poison,
    /// Magnet
    Magnet,
    /// Shield picked up
    Shield,
    /// Rock
    Rock,
}

impl SoundEffect {
    /// Stable cue id
    pub fn id(&self) -> &'static str {
        match self {
            SoundEffect::CatchFruit => "catchFruit",
            SoundEffect::Explode => "explode",
            SoundEffect::Heal => "heal",
            SoundEffect::Poison => "poison",
            SoundEffect::Magnet => "magnet",
            SoundEffect::Shield => "shield",
            SoundEffect::Rock => "rock",
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    Background,
}

impl Track {
    pub fn id(&self) -> &'static str {
        match self {
            Track::Background => "background",
        }
    }
}

/// Fire-and-forget audio output
pub trait AudioSink {
    fn play_effect(&mut self, effect: SoundEffect);
    fn play_background(&mut self, track: Track);
    fn stop_background(&mut self);
}

/// Discards every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_effect(&mut self, _effect: SoundEffect) {}
    fn play_background(&mut self, _track: Track) {}
    fn stop_background(&mut self) {}
}

/// A cue as seen by `RecordingAudio`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Effect(SoundEffect),
    PlayTrack(Track),
    StopTrack,
}

/// Keeps every cue in order (for tests and replays)
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub cues: Vec<Cue>,
}

impl RecordingAudio {
    pub fn effects(&self) -> Vec<SoundEffect> {
        self.cues
            .iter()
            .filter_map(|c| match c {
                Cue::Effect(e) => Some(*e),
                _ => None,
            })
            .collect()
    }
}

impl AudioSink for RecordingAudio {
    fn play_effect(&mut self, effect: SoundEffect) {
        self.cues.push(Cue::Effect(effect));
    }

    fn play_background(&mut self, track: Track) {
        self.cues.push(Cue::PlayTrack(track));
    }

    fn stop_background(&mut self) {
        self.cues.push(Cue::StopTrack);
    }
}

/// Audio manager for the game
///
/// Applies the volume and mute settings and tracks which background track is
/// playing. There is no sound backend here; cues that pass the mixer settings
/// are logged, which is what a headless or terminal build wants.
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_enabled: bool,
    music_enabled: bool,
    muted: bool,
    current_track: Option<Track>,
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
            sfx_enabled: true,
            music_enabled: true,
            muted: false,
            current_track: None,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.sfx_enabled = enabled;
    }

    pub fn set_music_enabled(&mut self, enabled: bool) {
        self.music_enabled = enabled;
        if !enabled {
            self.current_track = None;
        }
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn current_track(&self) -> Option<Track> {
        self.current_track
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }
}

impl AudioSink for AudioManager {
    fn play_effect(&mut self, effect: SoundEffect) {
        if !self.sfx_enabled || self.effective_volume() <= 0.0 {
            return;
        }
        log::debug!("sfx {} (vol {:.2})", effect.id(), self.effective_volume());
    }

    fn play_background(&mut self, track: Track) {
        if !self.music_enabled {
            return;
        }
        if self.current_track.replace(track).is_some() {
            log::debug!("music restarted: {}", track.id());
        } else {
            log::debug!("music started: {}", track.id());
        }
    }

    fn stop_background(&mut self) {
        if let Some(track) = self.current_track.take() {
            log::debug!("music stopped: {}", track.id());
        }
    }
}
