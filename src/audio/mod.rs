pub mod engine;
pub mod preview;
pub mod status;

pub use engine::AudioEngine;
pub use preview::{PreviewAudio, PreviewFactory};
