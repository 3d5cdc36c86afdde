use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::playback::PlaybackError;

/// Owns the process-wide audio output. Every preview gets its own sink on
/// the shared mixer.
pub struct AudioEngine {
    stream: OutputStream,
}

impl AudioEngine {
    pub fn new() -> Result<Self, PlaybackError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlaybackError::Output(e.to_string()))?;
        stream.log_on_drop(false);

        Ok(Self { stream })
    }

    /// A new sink that starts paused, so nothing is heard until asked.
    pub fn new_sink(&self) -> Sink {
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink
    }
}
