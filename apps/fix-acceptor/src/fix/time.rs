//! FIX timestamp formatting (UTC, millisecond precision).

use chrono::{DateTime, Utc};

/// Render a timestamp in FIX `SendingTime` format: `YYYYMMDD-HH:MM:SS.sss`.
#[must_use]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d-%H:%M:%S%.3f").to_string()
}

/// Current UTC time in FIX `SendingTime` format.
#[must_use]
pub fn sending_time_now() -> String {
    format_timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn format_matches_fix_layout() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        assert_eq!(format_timestamp(at), "20250314-09:26:53.000");
    }

    #[test]
    fn sending_time_has_fix_shape() {
        let now = sending_time_now();
        assert_eq!(now.len(), 21);
        assert_eq!(&now[8..9], "-");
        assert_eq!(&now[17..18], ".");
    }
}
