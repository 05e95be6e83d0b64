use chrono::{DateTime, Utc};

#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

/// `MM:SS` below one hour, `H:MM:SS` from one hour up.
#[must_use]
pub fn format_countdown(secs: u32) -> String {
    let hours = secs / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_switches_to_hours() {
        assert_eq!(format_countdown(0), "00:00");
        assert_eq!(format_countdown(2_700), "45:00");
        assert_eq!(format_countdown(3_599), "59:59");
        assert_eq!(format_countdown(7_200), "2:00:00");
        assert_eq!(format_countdown(3_661), "1:01:01");
    }
}
