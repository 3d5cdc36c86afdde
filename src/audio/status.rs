use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Load state of one preview, shared between the resource and its loader
/// task.
#[derive(Default, Debug)]
pub struct PreviewStatus {
    loaded: AtomicBool,
    total_duration_millis: AtomicU64,
    generation: AtomicU64,
}

impl PreviewStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loaded(&self, loaded: bool) {
        self.loaded.store(loaded, Ordering::Release);
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub fn set_total_duration(&self, duration: Duration) {
        self.total_duration_millis
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// `None` until the decoder has reported a length.
    pub fn total_duration(&self) -> Option<Duration> {
        match self.total_duration_millis.load(Ordering::Relaxed) {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Forgets the loaded clip and returns the new generation. Loaders
    /// started for an older generation must not publish their result.
    pub fn reset(&self) -> u64 {
        self.set_loaded(false);
        self.total_duration_millis.store(0, Ordering::Relaxed);
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}
