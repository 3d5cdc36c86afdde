use std::sync::Arc;

use flume::Receiver;
use ratatui::{Frame, style::Style};

use crate::{
    audio::{AudioEngine, PreviewFactory},
    config::Config,
    event::events::Event,
    http::CatalogClient,
    playback::PlaybackCoordinator,
    store::ResultStore,
    util::colors,
};

use super::{
    context::AppContext,
    message::AppMessage,
    tui::{self, TerminalEvent},
    util::handler::EventHandler,
    views::Search,
};

pub struct App {
    pub event_rx: Receiver<Event>,
    pub ctx: AppContext,
    pub store: ResultStore,
    pub coordinator: PlaybackCoordinator,
    pub search: Search,
    pub has_focus: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> color_eyre::Result<Self> {
        let (event_tx, event_rx) = flume::unbounded();
        let client = Arc::new(CatalogClient::new(&config)?);
        let players = PreviewFactory::new(AudioEngine::new()?, client.clone(), event_tx.clone());

        let ctx = AppContext {
            api: client,
            players: Box::new(players),
            event_tx,
            config,
        };
        Ok(Self::with_context(ctx, event_rx))
    }

    /// `event_rx` must be the receiving end of `ctx.event_tx`.
    pub fn with_context(ctx: AppContext, event_rx: Receiver<Event>) -> Self {
        let store = ResultStore::new(ctx.config.page_size);

        Self {
            event_rx,
            ctx,
            store,
            coordinator: PlaybackCoordinator::new(),
            search: Search::default(),
            has_focus: true,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = tui::Tui::new()?;
        tui.enter()?;

        EventHandler::handle_event(self, TerminalEvent::Init, &mut tui)?;
        let mut should_render = true;
        while !self.should_quit {
            if should_render {
                tui.draw(|f| {
                    self.ui(f);
                })?;
            }

            should_render = EventHandler::handle_events(self, &mut tui).await?;
        }

        self.coordinator.dispose_all();
        tui.exit()?;
        Ok(())
    }

    fn ui(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame
            .buffer_mut()
            .set_style(area, Style::new().bg(colors::BACKGROUND));
        self.search
            .render(frame, area, &self.store, &self.coordinator);
    }

    /// Turns a user intent into an application event. Everything goes
    /// through the event queue so it is handled in arrival order.
    pub fn update(&mut self, msg: AppMessage) {
        let event = match msg {
            AppMessage::Quit => {
                self.should_quit = true;
                return;
            }
            AppMessage::None => return,
            AppMessage::Search(term) => Event::Search(term),
            AppMessage::PreviousPage => Event::ChangePage(self.store.page().saturating_sub(1)),
            AppMessage::NextPage => Event::ChangePage(self.store.page() + 1),
            AppMessage::TogglePlayback(id) => Event::TogglePlayback(id),
        };
        let _ = self.ctx.event_tx.send(event);
    }
}
