use std::fmt;

use super::resource::AudioResource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One preview player bound to a single track.
pub struct PlayerWidget {
    track_id: u64,
    pub(super) is_paused: bool,
    pub(super) is_buffering: bool,
    pub(super) progress_percent: f64,
    pub(super) resource: Box<dyn AudioResource>,
}

impl PlayerWidget {
    pub fn new(track_id: u64, resource: Box<dyn AudioResource>) -> Self {
        Self {
            track_id,
            is_paused: true,
            is_buffering: false,
            progress_percent: 0.0,
            resource,
        }
    }

    pub fn track_id(&self) -> u64 {
        self.track_id
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_buffering(&self) -> bool {
        self.is_buffering
    }

    pub fn progress_percent(&self) -> f64 {
        self.progress_percent
    }

    pub fn position(&self) -> Option<std::time::Duration> {
        self.resource.current_time()
    }

    pub fn duration(&self) -> Option<std::time::Duration> {
        self.resource.duration()
    }
}

impl fmt::Debug for PlayerWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerWidget")
            .field("track_id", &self.track_id)
            .field("is_paused", &self.is_paused)
            .field("is_buffering", &self.is_buffering)
            .field("progress_percent", &self.progress_percent)
            .finish_non_exhaustive()
    }
}
