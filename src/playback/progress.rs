use std::time::Duration;

/// Percentage of `duration` covered by `position`, clamped to `[0, 100]` and
/// rounded to two decimals. `None` when the duration is unknown or zero.
pub fn progress_percent(position: Duration, duration: Duration) -> Option<f64> {
    if duration.is_zero() {
        return None;
    }

    let ratio = position.as_secs_f64() / duration.as_secs_f64();
    let percent = (ratio * 100.0).clamp(0.0, 100.0);
    Some((percent * 100.0).round() / 100.0)
}
