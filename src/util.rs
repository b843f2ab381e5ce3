/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Convert a 0-100 percentage into a gauge ratio.
pub fn percent_to_ratio(percent: f64) -> f64 {
    (percent / 100.0).clamp(0.0, 1.0)
}
