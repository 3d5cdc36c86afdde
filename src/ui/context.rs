use std::sync::Arc;

use flume::Sender;

use crate::{config::Config, event::events::Event, http::SearchApi, playback::ResourceFactory};

/// Long-lived collaborators shared by the handlers.
pub struct AppContext {
    pub api: Arc<dyn SearchApi>,
    pub players: Box<dyn ResourceFactory>,
    pub event_tx: Sender<Event>,
    pub config: Config,
}
