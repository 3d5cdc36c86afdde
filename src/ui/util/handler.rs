use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{info, warn};

use crate::{
    event::events::Event,
    http::SearchApi,
    playback::{PlaybackError, WidgetId, ticker::spawn_ticker},
    ui::{
        app::App,
        input::InputHandler,
        message::AppMessage,
        tui::{TerminalEvent, Tui},
    },
};

pub struct EventHandler;

impl EventHandler {
    pub async fn handle_events(app: &mut App, tui: &mut Tui) -> color_eyre::Result<bool> {
        let mut should_render = false;
        if let Some(evt) = tui.next().await {
            if Self::handle_event(app, evt, tui)? {
                should_render = true;
            }
        }

        while let Ok(evt) = app.event_rx.try_recv() {
            Self::handle_action(app, evt);
            should_render = true;
        }

        Ok(should_render)
    }

    pub fn handle_event(
        app: &mut App,
        evt: TerminalEvent,
        tui: &mut Tui,
    ) -> color_eyre::Result<bool> {
        match evt {
            TerminalEvent::Init => {}
            TerminalEvent::FocusGained => {
                app.has_focus = true;
                tui.clear()?;
            }
            TerminalEvent::FocusLost => app.has_focus = false,
            TerminalEvent::Key(key) => Self::handle_key_event(app, key),
            TerminalEvent::Paste(text) => app.search.paste(&text),
            TerminalEvent::Resize(_, _) => {}
            TerminalEvent::Tick => {
                return Ok(app.has_focus);
            }
        }

        Ok(true)
    }

    pub fn handle_action(app: &mut App, evt: Event) {
        match evt {
            Event::Search(term) => {
                app.coordinator.pause_all();
                app.store.prepare_search(term);
                Self::spawn_fetch(app);
            }
            Event::ChangePage(page) => match app.store.prepare_page(page) {
                Ok(()) => Self::spawn_fetch(app),
                Err(e) => {
                    info!(page, "page_change_rejected: {e}");
                    app.search.set_notice(e.to_string());
                }
            },
            Event::ResultsFetched(tracks) => {
                app.store.complete_fetch(tracks);
                Self::rebuild_players(app);
            }
            Event::FetchFailed(e) => {
                app.store.fail_fetch(&e);
                app.search.set_notice(format!("Search failed: {e}"));
            }
            Event::TogglePlayback(id) => match app.coordinator.toggle(id) {
                Ok(()) => {}
                Err(PlaybackError::UnknownWidget(_)) => {
                    info!(widget = %id, "toggle_for_disposed_player");
                }
                Err(e) => {
                    warn!(widget = %id, "toggle_failed: {e}");
                    if e == PlaybackError::NoPreview {
                        app.search.set_notice("This track has no preview");
                    }
                }
            },
            Event::Player(id, event) => app.coordinator.handle_event(id, event),
            Event::PlayerTick(id) => {
                app.coordinator.tick(id);
            }
        }
    }

    /// Issues the store's current query on a detached task. Nothing cancels
    /// it: if another fetch starts meanwhile, whichever resolves last wins.
    fn spawn_fetch(app: &mut App) {
        let query = app.store.begin_fetch();
        let api = app.ctx.api.clone();
        let tx = app.ctx.event_tx.clone();

        tokio::spawn(async move {
            match api.search(&query).await {
                Ok(tracks) => {
                    let _ = tx.send(Event::ResultsFetched(tracks));
                }
                Err(e) => {
                    let _ = tx.send(Event::FetchFailed(e.to_string()));
                }
            }
        });
    }

    /// Replaces every player with a fresh one per displayed row. Rows are
    /// bound to widget ids, so repeated track ids still get their own player.
    fn rebuild_players(app: &mut App) {
        app.coordinator.dispose_all();

        let ctx = &app.ctx;
        let tracks = app.store.filtered().unwrap_or_default();
        let mut rows: Vec<WidgetId> = Vec::with_capacity(tracks.len());
        for track in &tracks {
            let id = app
                .coordinator
                .register_with(track.id, |id| ctx.players.create(id, track));
            let ticker = spawn_ticker(id, ctx.config.tick_interval, ctx.event_tx.clone());
            app.coordinator.attach_ticker(id, ticker);
            rows.push(id);
        }

        info!(players = rows.len(), "players_rebuilt");
        app.search.set_rows(rows);
    }

    fn handle_key_event(app: &mut App, evt: KeyEvent) {
        if evt.kind != KeyEventKind::Press {
            return;
        }

        if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (evt.code, evt.modifiers) {
            app.update(AppMessage::Quit);
            return;
        }

        if let Some(msg) = app.search.handle_input(evt, &app.store) {
            app.update(msg);
            return;
        }

        if let Some(msg) = InputHandler::handle_key(evt) {
            app.update(msg);
        }
    }
}
