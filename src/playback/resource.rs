use std::time::Duration;

use crate::http::Track;

use super::{error::PlaybackError, widget::WidgetId};

/// Control surface of one playable clip.
pub trait AudioResource: Send {
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    /// Current position, or `None` while the clip is not loaded yet.
    fn current_time(&self) -> Option<Duration>;
    fn duration(&self) -> Option<Duration>;
    fn has_ended(&self) -> bool;
}

/// Notifications a resource raises asynchronously.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Waiting,
    CanPlay,
    Failed(String),
}

/// Builds the resource behind each displayed track's player.
pub trait ResourceFactory {
    fn create(&self, id: WidgetId, track: &Track) -> Box<dyn AudioResource>;
}
