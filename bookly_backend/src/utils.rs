//! Shared helpers and constants.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as RFC 3339 with millisecond precision. The fixed width
/// keeps lexical order equal to chronological order, which the
/// `ORDER BY created_at` queries rely on.
pub fn now_utc_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_fixed_width_utc() {
        let ts = now_utc_iso();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }
}
