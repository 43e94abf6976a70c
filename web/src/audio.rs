use js_sys::Promise;
use memory_quest_core::{AudioSink, MusicSettings, SoundCue};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

const FLIP_SRC: &str = "/button-202966.mp3";
const MISMATCH_SRC: &str = "/unmatch-sound.mp3";
const MUSIC_SRC: &str = "/background-music.mp3";

fn load(src: &str) -> Option<HtmlAudioElement> {
    match HtmlAudioElement::new_with_src(src) {
        Ok(element) => Some(element),
        Err(err) => {
            log::error!("failed to create audio element for {}: {:?}", src, err);
            None
        }
    }
}

/// Waits for a `play()` promise; browsers reject it until the first user gesture.
async fn settle_playback(src: String, promise: Promise) -> bool {
    match JsFuture::from(promise).await {
        Ok(_) => true,
        Err(err) => {
            log::warn!("playback of {} refused: {:?}", src, err);
            false
        }
    }
}

fn start(element: &HtmlAudioElement) {
    match element.play() {
        Ok(promise) => {
            let src = element.src();
            spawn_local(async move {
                settle_playback(src, promise).await;
            });
        }
        Err(err) => log::error!("failed to play {}: {:?}", element.src(), err),
    }
}

/// Plays sound cues and the looping background track through detached `<audio>` elements.
#[derive(Debug)]
pub(crate) struct DomAudio {
    flip: Option<HtmlAudioElement>,
    mismatch: Option<HtmlAudioElement>,
    music: Option<HtmlAudioElement>,
    music_settings: MusicSettings,
}

impl DomAudio {
    pub(crate) fn new(music_settings: MusicSettings) -> Self {
        let music = load(MUSIC_SRC);
        if let Some(music) = &music {
            music.set_loop(true);
            music.set_autoplay(true);
        }

        let mut audio = Self {
            flip: load(FLIP_SRC),
            mismatch: load(MISMATCH_SRC),
            music,
            music_settings,
        };
        audio.apply_music(music_settings);
        audio
    }

    fn ensure_music(&self) {
        if let Some(music) = &self.music {
            if !self.music_settings.is_muted() && music.paused() {
                start(music);
            }
        }
    }
}

impl AudioSink for DomAudio {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("sound cue: {:?}", cue);
        let element = match cue {
            SoundCue::Flip => &self.flip,
            SoundCue::Mismatch => &self.mismatch,
        };
        if let Some(element) = element {
            element.set_current_time(0.0);
            start(element);
        }
        // autoplay is usually blocked until the first click lands
        self.ensure_music();
    }

    fn apply_music(&mut self, settings: MusicSettings) {
        log::debug!(
            "music: muted={} volume={}",
            settings.is_muted(),
            settings.volume()
        );
        self.music_settings = settings;
        if let Some(music) = &self.music {
            music.set_muted(settings.is_muted());
            music.set_volume(f64::from(settings.effective_volume()));
        }
        self.ensure_music();
    }
}
