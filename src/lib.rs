pub mod audio;
pub mod config;
pub mod event;
pub mod http;
pub mod playback;
pub mod store;
pub mod ui;
pub mod util;
