//! Audio capability
//!
//! Screens reach audio only through the [`AudioService`] held by the
//! application context. The frame loop advances it once per frame,
//! independent of screen transitions.

mod fade;
mod rodio_backend;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

pub use fade::{FadeDirection, FadeTick, MusicFade};
pub use rodio_backend::RodioAudio;

/// Default master volume
pub const DEFAULT_MASTER_VOLUME: f32 = 0.1;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Device(String),
    #[error("music file not found: {0}")]
    NotFound(PathBuf),
    #[error("music '{0}' is not loaded")]
    NotLoaded(String),
    #[error("failed to decode '{name}': {reason}")]
    Decode { name: String, reason: String },
}

/// Music playback capability
pub trait AudioService {
    /// Advances fades; called once per frame
    fn update(&mut self, dt: f32);

    /// Registers a music track under `name`
    fn load_music(&mut self, name: &str, path: &Path) -> Result<(), AudioError>;

    /// Forgets a track, stopping it if it is playing
    fn unload_music(&mut self, name: &str);

    /// Starts `name`, replacing whatever was playing
    fn play_music(&mut self, name: &str, volume: f32, looping: bool) -> Result<(), AudioError>;

    fn stop_music(&mut self);

    /// Ramps the current track from silence; no-op without music
    fn fade_music_in(&mut self, duration: f32);

    /// Ramps the current track to silence, then stops it; no-op without music
    fn fade_music_out(&mut self, duration: f32);

    /// Sets master volume, clamped to [0, 1]
    fn set_master_volume(&mut self, volume: f32);

    fn master_volume(&self) -> f32;

    fn is_music_playing(&self) -> bool;

    /// Name of the current track
    fn current_music(&self) -> Option<&str>;
}

/// What the backend must do after the deck changed state
#[derive(Debug, Clone, Copy, PartialEq)]
enum DeckEffect {
    Volume(f32),
    Stop,
}

/// Backend-independent music state: loaded tracks, current track, fades
/// and the volume chain `play × fade × master`
#[derive(Debug)]
struct MusicDeck {
    tracks: HashMap<String, PathBuf>,
    current: Option<String>,
    play_volume: f32,
    base_volume: f32,
    fade: Option<MusicFade>,
    master_volume: f32,
}

impl MusicDeck {
    fn new() -> Self {
        Self {
            tracks: HashMap::new(),
            current: None,
            play_volume: 1.0,
            base_volume: 1.0,
            fade: None,
            master_volume: DEFAULT_MASTER_VOLUME,
        }
    }

    fn output_volume(&self) -> f32 {
        self.play_volume * self.base_volume * self.master_volume
    }

    fn load(&mut self, name: &str, path: &Path) -> Result<(), AudioError> {
        if !path.is_file() {
            return Err(AudioError::NotFound(path.to_path_buf()));
        }
        self.tracks.insert(name.to_string(), path.to_path_buf());
        debug!(name, path = %path.display(), "Music loaded");
        Ok(())
    }

    fn track(&self, name: &str) -> Result<&Path, AudioError> {
        self.tracks
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| AudioError::NotLoaded(name.to_string()))
    }

    /// Returns true if the unloaded track was playing
    fn unload(&mut self, name: &str) -> bool {
        self.tracks.remove(name);
        if self.current.as_deref() == Some(name) {
            self.stop();
            return true;
        }
        false
    }

    fn start(&mut self, name: &str, volume: f32) {
        self.current = Some(name.to_string());
        self.play_volume = volume.clamp(0.0, 1.0);
        self.base_volume = 1.0;
        self.fade = None;
    }

    fn stop(&mut self) {
        self.current = None;
        self.fade = None;
        self.base_volume = 1.0;
    }

    fn begin_fade(&mut self, fade: MusicFade) -> Option<DeckEffect> {
        self.current.as_ref()?;
        self.base_volume = fade.start_volume();
        self.fade = Some(fade);
        Some(DeckEffect::Volume(self.output_volume()))
    }

    fn set_master(&mut self, volume: f32) -> DeckEffect {
        self.master_volume = volume.clamp(0.0, 1.0);
        DeckEffect::Volume(self.output_volume())
    }

    fn update(&mut self, dt: f32) -> Option<DeckEffect> {
        let fade = self.fade.as_mut()?;
        let tick = fade.advance(dt);
        let direction = fade.direction();
        self.base_volume = tick.volume;

        if !tick.finished {
            return Some(DeckEffect::Volume(self.output_volume()));
        }

        self.fade = None;
        match direction {
            FadeDirection::In => Some(DeckEffect::Volume(self.output_volume())),
            FadeDirection::Out => {
                debug!(music = ?self.current, "Fade out finished, stopping music");
                self.stop();
                Some(DeckEffect::Stop)
            }
        }
    }
}

/// Audio service with no output device
///
/// Tracks playback state exactly like [`RodioAudio`] so screens behave the
/// same when no device is available.
#[derive(Debug)]
pub struct SilentAudio {
    deck: MusicDeck,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self {
            deck: MusicDeck::new(),
        }
    }
}

impl Default for SilentAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioService for SilentAudio {
    fn update(&mut self, dt: f32) {
        self.deck.update(dt);
    }

    fn load_music(&mut self, name: &str, path: &Path) -> Result<(), AudioError> {
        self.deck.load(name, path)
    }

    fn unload_music(&mut self, name: &str) {
        self.deck.unload(name);
    }

    fn play_music(&mut self, name: &str, volume: f32, _looping: bool) -> Result<(), AudioError> {
        self.deck.track(name)?;
        self.deck.start(name, volume);
        Ok(())
    }

    fn stop_music(&mut self) {
        self.deck.stop();
    }

    fn fade_music_in(&mut self, duration: f32) {
        self.deck.begin_fade(MusicFade::fade_in(duration));
    }

    fn fade_music_out(&mut self, duration: f32) {
        self.deck.begin_fade(MusicFade::fade_out(duration));
    }

    fn set_master_volume(&mut self, volume: f32) {
        self.deck.set_master(volume);
    }

    fn master_volume(&self) -> f32 {
        self.deck.master_volume
    }

    fn is_music_playing(&self) -> bool {
        self.deck.current.is_some()
    }

    fn current_music(&self) -> Option<&str> {
        self.deck.current.as_deref()
    }
}

/// Opens the default output device, falling back to [`SilentAudio`]
pub fn open_default() -> Box<dyn AudioService> {
    match RodioAudio::open_default() {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            warn!(error = %e, "Audio device unavailable, continuing without sound");
            Box::new(SilentAudio::new())
        }
    }
}
