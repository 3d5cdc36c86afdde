pub mod handler;

use std::time::{SystemTime, UNIX_EPOCH};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

pub fn spinner_frame() -> &'static str {
    SPINNER_FRAMES[(now_millis() / 100) as usize % SPINNER_FRAMES.len()]
}

pub fn get_active_track_icon(is_playing: bool) -> &'static str {
    if is_playing {
        const FRAME_STEP_MS: u64 = 100;

        let step = (now_millis() / FRAME_STEP_MS) as usize % 6;
        match step {
            0 | 5 => "·",
            1 | 4 => "•",
            _ => "●",
        }
    } else {
        "•"
    }
}
