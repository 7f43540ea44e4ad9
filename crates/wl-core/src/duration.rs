//! Human-readable durations in the tracker's `1h 26m 40s` notation.

pub const SECS_PER_HOUR: i64 = 3600;
pub const SECS_PER_MINUTE: i64 = 60;

/// Convert hours and minutes into seconds.
pub const fn hm_to_secs(hours: i64, minutes: i64) -> i64 {
    hours * SECS_PER_HOUR + minutes * SECS_PER_MINUTE
}

/// Format seconds as `{h}h {m}m {s}s`, omitting zero components.
///
/// Zero (and negative input) renders as `0s`.
pub fn format_secs(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / SECS_PER_HOUR;
    let minutes = (secs % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = secs % SECS_PER_MINUTE;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || parts.is_empty() {
        parts.push(format!("{seconds}s"));
    }
    parts.join(" ")
}
