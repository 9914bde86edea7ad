//! Music output through rodio

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, info};

use super::{AudioError, AudioService, DeckEffect, MusicDeck, MusicFade};

/// [`AudioService`] backed by the default output device
pub struct RodioAudio {
    // Dropping the stream silences every sink connected to it
    stream: OutputStream,
    sink: Option<Sink>,
    deck: MusicDeck,
}

impl RodioAudio {
    /// Opens the default output device
    pub fn open_default() -> Result<Self, AudioError> {
        let stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| AudioError::Device(e.to_string()))?;
        info!("Audio output stream opened");

        Ok(Self {
            stream,
            sink: None,
            deck: MusicDeck::new(),
        })
    }

    fn apply(&mut self, effect: Option<DeckEffect>) {
        match effect {
            Some(DeckEffect::Volume(volume)) => {
                if let Some(sink) = &self.sink {
                    sink.set_volume(volume);
                }
            }
            Some(DeckEffect::Stop) => self.stop_sink(),
            None => {}
        }
    }

    fn stop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl AudioService for RodioAudio {
    fn update(&mut self, dt: f32) {
        let effect = self.deck.update(dt);
        self.apply(effect);
    }

    fn load_music(&mut self, name: &str, path: &Path) -> Result<(), AudioError> {
        self.deck.load(name, path)
    }

    fn unload_music(&mut self, name: &str) {
        if self.deck.unload(name) {
            self.stop_sink();
        }
    }

    fn play_music(&mut self, name: &str, volume: f32, looping: bool) -> Result<(), AudioError> {
        let path = self.deck.track(name)?;
        let file = File::open(path).map_err(|_| AudioError::NotFound(path.to_path_buf()))?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| AudioError::Decode {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

        self.stop_sink();
        let sink = Sink::connect_new(self.stream.mixer());
        if looping {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }

        self.deck.start(name, volume);
        sink.set_volume(self.deck.output_volume());
        self.sink = Some(sink);

        debug!(name, volume, looping, "Music started");
        Ok(())
    }

    fn stop_music(&mut self) {
        self.deck.stop();
        self.stop_sink();
    }

    fn fade_music_in(&mut self, duration: f32) {
        let effect = self.deck.begin_fade(MusicFade::fade_in(duration));
        self.apply(effect);
    }

    fn fade_music_out(&mut self, duration: f32) {
        let effect = self.deck.begin_fade(MusicFade::fade_out(duration));
        self.apply(effect);
    }

    fn set_master_volume(&mut self, volume: f32) {
        let effect = self.deck.set_master(volume);
        self.apply(Some(effect));
    }

    fn master_volume(&self) -> f32 {
        self.deck.master_volume
    }

    fn is_music_playing(&self) -> bool {
        self.deck.current.is_some() && self.sink.as_ref().is_some_and(|sink| !sink.empty())
    }

    fn current_music(&self) -> Option<&str> {
        self.deck.current.as_deref()
    }
}
