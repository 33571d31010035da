//! Named sound cues
//!
//! The simulation only names cues; playback belongs to the host. Sinks are
//! fire-and-forget and must never block the tick.

/// Sound cues the session emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Damage applied to an enemy or the player
    Hit,
    /// Level-up or boss defeated
    Success,
    /// Run started
    BackgroundLoopStart,
    /// Run ended
    BackgroundLoopStop,
}

impl SoundCue {
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Hit => "hit",
            SoundCue::Success => "success",
            SoundCue::BackgroundLoopStart => "background-loop-start",
            SoundCue::BackgroundLoopStop => "background-loop-stop",
        }
    }
}

/// Where cues go
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

/// Headless sink: applies volume and mute, then logs the cue
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
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
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioSink for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        log::trace!("cue {} at volume {:.2}", cue.name(), vol);
    }
}

/// Keeps every cue it receives; handy for hosts that batch playback
impl AudioSink for Vec<SoundCue> {
    fn play(&mut self, cue: SoundCue) {
        self.push(cue);
    }
}
