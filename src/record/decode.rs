//! Raw-value decoding helpers.

use chrono::NaiveDateTime;

/// Raw value meaning "not recorded".
pub(crate) const SENTINEL: &str = "-";

/// `strftime` layout of the local part of an access-log timestamp.
pub(crate) const LOCALTIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Decode an integer field, mapping the sentinel to `absent`.
pub(crate) fn sentinel_int(value: &str, absent: i64) -> Option<i64> {
    if value == SENTINEL {
        return Some(absent);
    }
    value.parse().ok()
}

/// Parse a `[+|-]HHMM` UTC offset into signed seconds.
pub(crate) fn gmtoffset_seconds(value: &str) -> Option<i32> {
    let (sign, digits) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => (1, value),
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Parse the local part of a timestamp, e.g. `10/Oct/2000:13:55:00`.
pub(crate) fn localtime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, LOCALTIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn sentinel_decodes_to_absent_value() {
        assert_eq!(sentinel_int("-", 0), Some(0));
        assert_eq!(sentinel_int("-", -1), Some(-1));
        assert_eq!(sentinel_int("2326", 0), Some(2326));
        assert_eq!(sentinel_int("12a", 0), None);
        assert_eq!(sentinel_int("", 0), None);
    }

    #[test]
    fn offsets() {
        let cases = [
            ("-0730", Some(-27000)),
            ("+0200", Some(7200)),
            ("0100", Some(3600)),
            ("+0000", Some(0)),
            ("-07", None),
            ("+07:00", None),
            ("", None),
        ];
        for (raw, expected) in cases {
            assert_eq!(gmtoffset_seconds(raw), expected, "offset {raw:?}");
        }
    }

    #[test]
    fn localtime_parses_month_names() {
        let date = NaiveDate::from_ymd_opt(2000, 10, 10).unwrap();
        let time = NaiveTime::from_hms_opt(13, 55, 0).unwrap();
        assert_eq!(localtime("10/Oct/2000:13:55:00"), Some(NaiveDateTime::new(date, time)));
        assert_eq!(localtime("10/Foo/2000:13:55:00"), None);
    }
}
