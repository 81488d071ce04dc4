use std::time::Duration;

/// Formats a refill countdown as `HH:MM:SS`. Hours are not wrapped at 24.
pub fn format_countdown(remaining: Duration) -> String {
    let seconds = remaining.as_secs();
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Formats elapsed run time the way the HUD shows it, e.g. `Time: 12.3s`.
pub fn format_run_time(elapsed: Duration) -> String {
    format!("Time: {:.1}s", elapsed.as_secs_f32())
}
