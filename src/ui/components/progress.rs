use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Style, Stylize},
    symbols::border,
    text::ToSpan,
    widgets::{Block, Borders, Gauge, Widget},
};

use crate::util::{colors, format::format_duration};

/// Footer gauge following the preview that is currently playing.
pub struct ProgressWidget<'a> {
    track_title: &'a str,
    track_artist: Option<&'a str>,
    percent: f64,
    position: Option<Duration>,
    duration: Option<Duration>,
    is_playing: bool,
    is_buffering: bool,
}

impl<'a> ProgressWidget<'a> {
    pub fn new(track_title: &'a str, track_artist: Option<&'a str>, percent: f64) -> Self {
        Self {
            track_title,
            track_artist,
            percent,
            position: None,
            duration: None,
            is_playing: false,
            is_buffering: false,
        }
    }

    pub fn idle() -> Self {
        Self::new("Nothing playing", None, 0.0)
    }

    pub fn timing(mut self, position: Option<Duration>, duration: Option<Duration>) -> Self {
        self.position = position;
        self.duration = duration;
        self
    }

    pub fn state(mut self, is_playing: bool, is_buffering: bool) -> Self {
        self.is_playing = is_playing;
        self.is_buffering = is_buffering;
        self
    }
}

impl Widget for ProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let icon = if self.is_buffering {
            "…"
        } else if self.is_playing {
            "▶"
        } else {
            "■"
        };

        let mut track_info = format!("{icon}  {}", self.track_title);
        if let Some(artist) = self.track_artist {
            track_info = format!("{track_info} by {artist}");
        }

        let label = match (self.position, self.duration) {
            (Some(pos), Some(total)) => {
                format!("{} / {}", format_duration(pos), format_duration(total))
            }
            _ => format!("{:.2}%", self.percent),
        };

        Gauge::default()
            .block(
                Block::default()
                    .title_top(track_info)
                    .title_alignment(Alignment::Center)
                    .borders(Borders::ALL)
                    .border_set(border::ROUNDED),
            )
            .ratio((self.percent / 100.0).clamp(0.0, 1.0))
            .label(label.to_span().fg(Color::White))
            .gauge_style(Style::default().fg(colors::PRIMARY).bg(colors::BACKGROUND))
            .use_unicode(true)
            .render(area, buf);
    }
}
