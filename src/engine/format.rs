//! Display helpers for projection values

/// Format a millisecond span as zero-padded `MM:SS`.
///
/// Partial seconds are truncated, so a countdown reads `00:00` during its
/// final second. Minutes are not wrapped into hours.
pub fn format_countdown(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Whole-number percentage shown on the goal badge.
pub fn badge_percent(percentage: f64) -> u32 {
    if percentage.is_finite() && percentage > 0.0 {
        percentage.floor().min(100.0) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_pads_and_truncates() {
        assert_eq!(format_countdown(240_000), "04:00");
        assert_eq!(format_countdown(61_999), "01:01");
        assert_eq!(format_countdown(999), "00:00");
        assert_eq!(format_countdown(0), "00:00");
    }

    #[test]
    fn countdown_keeps_long_minutes() {
        assert_eq!(format_countdown(125 * 60_000 + 5_000), "125:05");
    }

    #[test]
    fn badge_floors_and_caps() {
        assert_eq!(badge_percent(99.9), 99);
        assert_eq!(badge_percent(100.0), 100);
        assert_eq!(badge_percent(250.0), 100);
        assert_eq!(badge_percent(f64::NAN), 0);
        assert_eq!(badge_percent(-5.0), 0);
    }
}
