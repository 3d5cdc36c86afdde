use std::time::Duration;

use chrono::{DateTime, Utc};
use unicode_width::UnicodeWidthChar;

/// Day-first short date, e.g. `22/9/2011`.
pub fn format_release_date(date: &DateTime<Utc>) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{minutes}:{seconds:02}")
}

/// Cuts `text` to at most `max_width` terminal columns, ending with `…` when
/// anything was dropped.
pub fn truncate(text: &str, max_width: usize) -> String {
    let total: usize = text.chars().filter_map(|c| c.width()).sum();
    if total <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}
