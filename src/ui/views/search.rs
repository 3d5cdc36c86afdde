use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::{
    http::Track,
    playback::{PlaybackCoordinator, PlayerWidget, WidgetId},
    store::ResultStore,
    ui::{
        components::{progress::ProgressWidget, spinner::Spinner},
        message::AppMessage,
        util::{get_active_track_icon, spinner_frame},
    },
    util::{
        colors,
        format::{format_duration, format_release_date, truncate},
    },
};

const KEY_HINTS: &str = " / search  ↵ play/pause  j/k move  h/l page  esc quit";

pub struct Search {
    input: String,
    is_editing: bool,
    list_state: ListState,
    notice: Option<String>,
    rows: Vec<WidgetId>,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            input: String::new(),
            is_editing: true,
            list_state: ListState::default(),
            notice: None,
            rows: Vec::new(),
        }
    }
}

impl Search {
    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// Binds the displayed rows, in order, to their players. Called
    /// whenever the result page is replaced.
    pub fn set_rows(&mut self, rows: Vec<WidgetId>) {
        self.list_state
            .select(if rows.is_empty() { None } else { Some(0) });
        self.rows = rows;
    }

    pub fn row_player(&self, row: usize) -> Option<WidgetId> {
        self.rows.get(row).copied()
    }

    pub fn paste(&mut self, text: &str) {
        if self.is_editing {
            self.input.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        store: &ResultStore,
        coordinator: &PlaybackCoordinator,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_input(f, chunks[0]);
        self.render_status(f, chunks[1], store);
        self.render_results(f, chunks[2], store, coordinator);
        render_footer(f, chunks[3], store, coordinator);

        self.render_hints(f, chunks[4], store);
    }

    /// Key hints on the left, the selected track's catalog link on the right.
    fn render_hints(&self, f: &mut Frame, area: Rect, store: &ResultStore) {
        let link = self
            .list_state
            .selected()
            .and_then(|i| store.filtered()?.get(i).copied())
            .and_then(Track::detail_url)
            .map(str::to_owned);

        let link_width = link
            .as_deref()
            .map_or(0, |url| (url.chars().count() as u16 + 1).min(area.width / 2));
        let [hints_area, link_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(link_width),
        ])
        .areas(area);

        f.render_widget(
            Paragraph::new(KEY_HINTS).style(Style::default().fg(colors::MUTED)),
            hints_area,
        );
        if let Some(url) = link {
            f.render_widget(
                Paragraph::new(truncate(&url, link_area.width as usize))
                    .style(Style::default().fg(colors::SECONDARY)),
                link_area,
            );
        }
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let input_style = if self.is_editing {
            Style::default().fg(colors::PRIMARY)
        } else {
            Style::default().fg(colors::NEUTRAL)
        };

        let input_block = Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .border_style(input_style);

        let text = if self.is_editing {
            format!("{}▏", self.input)
        } else {
            self.input.clone()
        };
        f.render_widget(Paragraph::new(text).block(input_block), area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect, store: &ResultStore) {
        if store.is_loading() {
            let spinner = Spinner::default()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label("Searching...");
            f.render_widget(spinner, area);
            return;
        }

        if let Some(notice) = &self.notice {
            f.render_widget(
                Paragraph::new(notice.as_str()).style(Style::default().fg(colors::SECONDARY)),
                area,
            );
            return;
        }

        let line = match store.filtered() {
            None => Line::from(Span::styled(
                "Press / to search the catalog",
                Style::default().fg(colors::MUTED),
            )),
            Some(tracks) if tracks.is_empty() => Line::from("No songs found for the search."),
            Some(tracks) => {
                let mut spans = vec![Span::styled(
                    format!(" {} ", tracks.len()),
                    Style::default()
                        .fg(colors::BACKGROUND)
                        .bg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )];

                if store.shows_pagination() {
                    let enabled = Style::default().fg(colors::PRIMARY);
                    let disabled = Style::default().fg(colors::NEUTRAL);
                    spans.push(Span::styled(
                        "  ‹ prev",
                        if store.has_previous_page() { enabled } else { disabled },
                    ));
                    spans.push(Span::raw(format!("  page {}  ", store.page())));
                    spans.push(Span::styled(
                        "next ›",
                        if store.has_next_page() { enabled } else { disabled },
                    ));
                }
                Line::from(spans)
            }
        };

        f.render_widget(Paragraph::new(line), area);
    }

    fn render_results(
        &mut self,
        f: &mut Frame,
        area: Rect,
        store: &ResultStore,
        coordinator: &PlaybackCoordinator,
    ) {
        let Some(tracks) = store.filtered() else {
            return;
        };

        if store.is_loading() && tracks.is_empty() {
            let spinner = Spinner::default()
                .with_style(Style::default().fg(colors::PRIMARY))
                .with_label("Searching...")
                .centered();
            f.render_widget(spinner, area);
            return;
        }

        let width = area.width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = tracks
            .iter()
            .enumerate()
            .map(|(row, track)| {
                let widget = self.row_player(row).and_then(|id| coordinator.get(id));
                track_item(track, widget, width)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        if self.list_state.selected().is_none() && !tracks.is_empty() {
            self.list_state.select(Some(0));
        }

        f.render_stateful_widget(list, area, &mut self.list_state);
    }

    pub fn handle_input(&mut self, key: KeyEvent, store: &ResultStore) -> Option<AppMessage> {
        self.notice = None;

        if self.is_editing {
            return match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => None,
                KeyCode::Enter => {
                    let term = self.input.trim().to_string();
                    if term.is_empty() {
                        return Some(AppMessage::None);
                    }
                    self.is_editing = false;
                    Some(AppMessage::Search(term))
                }
                KeyCode::Char(c) => {
                    self.input.push(c);
                    Some(AppMessage::None)
                }
                KeyCode::Backspace => {
                    self.input.pop();
                    Some(AppMessage::None)
                }
                KeyCode::Esc => {
                    self.is_editing = false;
                    Some(AppMessage::None)
                }
                _ => Some(AppMessage::None),
            };
        }

        let len = store.filtered().map_or(0, |t| t.len());
        match key.code {
            KeyCode::Char('/') => {
                self.is_editing = true;
                Some(AppMessage::None)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 {
                    let i = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
                    self.list_state.select(Some(i));
                }
                Some(AppMessage::None)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if len > 0 {
                    let i = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                    self.list_state.select(Some(i));
                }
                Some(AppMessage::None)
            }
            KeyCode::Char('g') => {
                if len > 0 {
                    self.list_state.select(Some(0));
                }
                Some(AppMessage::None)
            }
            KeyCode::Char('G') => {
                if len > 0 {
                    self.list_state.select(Some(len - 1));
                }
                Some(AppMessage::None)
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let player = self.list_state.selected().and_then(|i| self.row_player(i));
                Some(player.map_or(AppMessage::None, AppMessage::TogglePlayback))
            }
            _ => None,
        }
    }
}

fn player_icon(widget: Option<&PlayerWidget>) -> &'static str {
    match widget {
        Some(w) if w.is_buffering() => spinner_frame(),
        Some(w) if !w.is_paused() => get_active_track_icon(true),
        Some(w) if w.progress_percent() > 0.0 => "‖",
        _ => "▷",
    }
}

fn track_item(track: &Track, widget: Option<&PlayerWidget>, width: usize) -> ListItem<'static> {
    let is_active = widget.is_some_and(|w| !w.is_paused());

    let title_style = if is_active {
        Style::default()
            .fg(colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let heading = Line::from(vec![
        Span::raw(format!("{} ", player_icon(widget))),
        Span::styled(truncate(track.title(), width / 2), title_style),
        Span::raw(" - "),
        Span::styled(
            truncate(track.artist(), width / 2),
            Style::default().fg(colors::SECONDARY),
        ),
    ]);

    let mut details: Vec<String> = Vec::with_capacity(4);
    if let Some(album) = &track.collection_name {
        details.push(album.clone());
    }
    if let Some(genre) = &track.genre {
        details.push(genre.clone());
    }
    if let Some(date) = &track.release_date {
        details.push(format_release_date(date));
    }
    if let Some(length) = track.catalog_duration() {
        details.push(format_duration(length));
    }

    let mut detail_spans = vec![Span::styled(
        truncate(&format!("  {}", details.join(" · ")), width.saturating_sub(10)),
        Style::default().fg(colors::MUTED),
    )];
    if let Some(w) = widget.filter(|w| w.progress_percent() > 0.0) {
        detail_spans.push(Span::styled(
            format!("  {:.2}%", w.progress_percent()),
            Style::default().fg(colors::PRIMARY),
        ));
    }

    ListItem::new(vec![heading, Line::from(detail_spans)])
}

fn render_footer(
    f: &mut Frame,
    area: Rect,
    store: &ResultStore,
    coordinator: &PlaybackCoordinator,
) {
    let Some(widget) = coordinator.active().and_then(|id| coordinator.get(id)) else {
        f.render_widget(ProgressWidget::idle(), area);
        return;
    };

    let track = store
        .results()
        .and_then(|tracks| tracks.iter().find(|t| t.id == widget.track_id()));
    let title = track.map_or("Unknown Title", |t| t.title());
    let artist = track.map(|t| t.artist());

    let progress = ProgressWidget::new(title, artist, widget.progress_percent())
        .timing(widget.position(), widget.duration())
        .state(!widget.is_paused(), widget.is_buffering());
    f.render_widget(progress, area);
}
