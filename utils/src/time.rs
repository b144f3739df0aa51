//! Time formatting helpers.

use coffer_types::Timestamp;

/// Format a duration in seconds to a human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}

/// "ends in 5m 0s" / "ended", for a vote deadline seen from `now`.
pub fn format_remaining(deadline: Timestamp, now: Timestamp) -> String {
    if deadline.has_passed(now) {
        "ended".to_string()
    } else {
        format!("ends in {}", format_duration(deadline.remaining_from(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_magnitude() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(300), "5m 0s");
        assert_eq!(format_duration(7_260), "2h 1m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }

    #[test]
    fn remaining_until_deadline() {
        let deadline = Timestamp::new(300);
        assert_eq!(format_remaining(deadline, Timestamp::new(0)), "ends in 5m 0s");
        assert_eq!(format_remaining(deadline, Timestamp::new(300)), "ended");
    }
}
