use thiserror::Error;

use super::widget::WidgetId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("Track has no preview to play")]
    NoPreview,

    #[error("Unknown player {0}")]
    UnknownWidget(WidgetId),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Audio output error: {0}")]
    Output(String),

    #[error("Decoding error: {0}")]
    Decoding(String),
}
