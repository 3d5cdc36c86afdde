use crate::{
    http::Track,
    playback::{PlayerEvent, WidgetId},
};

#[derive(Debug, Clone)]
pub enum Event {
    // Events
    ResultsFetched(Vec<Track>),
    FetchFailed(String),
    Player(WidgetId, PlayerEvent),
    PlayerTick(WidgetId),

    // Commands
    Search(String),
    ChangePage(u32),
    TogglePlayback(WidgetId),
}
