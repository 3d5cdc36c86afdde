use std::{io::Cursor, sync::Arc, time::Duration};

use flume::Sender;
use rodio::{Decoder, Sink, Source};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{
    event::events::Event,
    http::{CatalogClient, Track},
    playback::{AudioResource, PlaybackError, PlayerEvent, ResourceFactory, WidgetId},
};

use super::{engine::AudioEngine, status::PreviewStatus};

/// A track preview clip played through its own sink.
///
/// The clip is downloaded and decoded on the first `play()`. Progress of
/// that load is reported back to the UI loop as `Event::Player` messages.
pub struct PreviewAudio {
    id: WidgetId,
    url: Option<String>,
    api: Arc<CatalogClient>,
    event_tx: Sender<Event>,
    sink: Arc<Sink>,
    status: Arc<PreviewStatus>,
    loader: Option<JoinHandle<()>>,
}

impl PreviewAudio {
    pub fn new(
        id: WidgetId,
        url: Option<String>,
        engine: &AudioEngine,
        api: Arc<CatalogClient>,
        event_tx: Sender<Event>,
    ) -> Self {
        Self {
            id,
            url: url.filter(|u| !u.is_empty()),
            api,
            event_tx,
            sink: Arc::new(engine.new_sink()),
            status: Arc::new(PreviewStatus::new()),
            loader: None,
        }
    }

    fn spawn_loader(&self, url: String) -> JoinHandle<()> {
        let id = self.id;
        let api = self.api.clone();
        let sink = self.sink.clone();
        let status = self.status.clone();
        let event_tx = self.event_tx.clone();
        let generation = status.generation();

        tokio::spawn(async move {
            let _ = event_tx.send(Event::Player(id, PlayerEvent::Waiting));

            let decoded = match api.fetch_preview(&url).await {
                Ok(bytes) => tokio::task::spawn_blocking(move || decode(bytes))
                    .await
                    .map_err(|e| PlaybackError::Decoding(e.to_string()))
                    .and_then(|r| r),
                Err(e) => Err(PlaybackError::Network(e.to_string())),
            };

            if status.generation() != generation {
                return;
            }

            match decoded {
                Ok(source) => {
                    if let Some(total) = source.total_duration() {
                        status.set_total_duration(total);
                    }
                    sink.append(source);
                    status.set_loaded(true);
                    info!(widget = %id, url = url.as_str(), "preview_ready");
                    let _ = event_tx.send(Event::Player(id, PlayerEvent::CanPlay));
                }
                Err(e) => {
                    let _ = event_tx.send(Event::Player(id, PlayerEvent::Failed(e.to_string())));
                }
            }
        })
    }
}

/// Hands out a `PreviewAudio` per displayed track, all on one output stream.
pub struct PreviewFactory {
    engine: AudioEngine,
    api: Arc<CatalogClient>,
    event_tx: Sender<Event>,
}

impl PreviewFactory {
    pub fn new(engine: AudioEngine, api: Arc<CatalogClient>, event_tx: Sender<Event>) -> Self {
        Self {
            engine,
            api,
            event_tx,
        }
    }
}

impl ResourceFactory for PreviewFactory {
    fn create(&self, id: WidgetId, track: &Track) -> Box<dyn AudioResource> {
        Box::new(PreviewAudio::new(
            id,
            track.preview_url.clone(),
            &self.engine,
            self.api.clone(),
            self.event_tx.clone(),
        ))
    }
}

fn decode(bytes: Vec<u8>) -> Result<Decoder<Cursor<Vec<u8>>>, PlaybackError> {
    let len = bytes.len() as u64;
    Decoder::builder()
        .with_data(Cursor::new(bytes))
        .with_byte_len(len)
        .with_hint("m4a")
        .with_gapless(true)
        .build()
        .map_err(|e| PlaybackError::Decoding(e.to_string()))
}

impl AudioResource for PreviewAudio {
    fn play(&mut self) -> Result<(), PlaybackError> {
        let url = self.url.clone().ok_or(PlaybackError::NoPreview)?;

        if self.has_ended() {
            debug!(widget = %self.id, "preview_restart");
            self.status.reset();
            self.loader = None;
        }

        self.sink.play();
        let needs_load = self
            .loader
            .as_ref()
            .is_none_or(|loader| loader.is_finished() && !self.status.is_loaded());
        if needs_load {
            self.loader = Some(self.spawn_loader(url));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.sink.pause();
    }

    fn current_time(&self) -> Option<Duration> {
        self.status.is_loaded().then(|| self.sink.get_pos())
    }

    fn duration(&self) -> Option<Duration> {
        self.status.total_duration()
    }

    fn has_ended(&self) -> bool {
        self.status.is_loaded() && self.sink.empty()
    }
}

impl Drop for PreviewAudio {
    fn drop(&mut self) {
        if let Some(loader) = self.loader.take() {
            loader.abort();
        }
        self.sink.stop();
    }
}
