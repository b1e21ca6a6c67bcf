//! Wire-format timestamps.
//!
//! All OCPP timestamps are ISO-8601 in UTC with a trailing `Z`; the codec
//! must never emit local time.

use chrono::{DateTime, SecondsFormat, Utc};

/// The current time formatted the way the wire expects it.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format an arbitrary UTC timestamp for the wire.
pub fn to_iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_with_z() {
        assert!(now_iso8601().ends_with('Z'));
    }
}
