use serde::{Deserialize, Serialize};

use crate::*;

/// One-shot sound effects requested by the game; playback never feeds back into the round.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Flip,
    Mismatch,
}

impl FlipOutcome {
    /// Cues to play for this outcome, in order.
    pub fn cues(self) -> impl Iterator<Item = SoundCue> {
        use FlipOutcome::*;
        let (flip, mismatch) = match self {
            NoChange => (None, None),
            Flipped | Matched | Won => (Some(SoundCue::Flip), None),
            Mismatched(_) => (Some(SoundCue::Flip), Some(SoundCue::Mismatch)),
        };
        flip.into_iter().chain(mismatch)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MusicSettings {
    muted: bool,
    volume: f32,
}

impl MusicSettings {
    pub const DEFAULT_VOLUME: f32 = 0.5;

    pub fn new(volume: f32) -> Self {
        let mut settings = Self {
            muted: false,
            volume: Self::DEFAULT_VOLUME,
        };
        settings.set_volume(volume);
        settings
    }

    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Volume the background track should actually play at.
    pub const fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Sets the volume, clamped to `[0, 1]`; moving the slider always unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        self.muted = false;
    }
}

impl Default for MusicSettings {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VOLUME)
    }
}

/// Fire-and-forget audio output.
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    fn apply_music(&mut self, settings: MusicSettings);

    fn play_outcome(&mut self, outcome: FlipOutcome) {
        for cue in outcome.cues() {
            self.play(cue);
        }
    }
}
