use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};
use unicode_width::UnicodeWidthStr;

use crate::ui::util::spinner_frame;

#[derive(Default)]
pub struct Spinner {
    style: Style,
    label: Option<String>,
    centered: bool,
}

impl Spinner {
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }
}

impl Widget for Spinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let symbol = spinner_frame();
        let text = match self.label {
            Some(label) => format!("{symbol} {label}"),
            None => symbol.to_string(),
        };

        let (x, y) = if self.centered {
            (
                area.x + area.width.saturating_sub(text.width() as u16) / 2,
                area.y + area.height / 2,
            )
        } else {
            (area.x, area.y)
        };

        buf.set_stringn(x, y, text, area.width as usize, self.style);
    }
}
