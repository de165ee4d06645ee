//! Time and timestamp helpers.

use chrono::{DateTime, NaiveTime, Utc, Weekday};

/// UTC timestamp used for `created_at`, `last_triggered_at`, event times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse a wall-clock trigger time in `HH:MM` or `HH:MM:SS` format.
///
/// Returns `None` for anything unparsable — callers skip and log rather
/// than fail, because trigger configs come from user input.
#[must_use]
pub fn parse_at(value: &str) -> Option<NaiveTime> {
    let format = if value.len() == 5 { "%H:%M" } else { "%H:%M:%S" };
    NaiveTime::parse_from_str(value, format).ok()
}

/// 3-letter lowercase code for a weekday (`"mon"` .. `"sun"`).
#[must_use]
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// Normalize a user-supplied day name to its 3-letter lowercase code.
///
/// Accepts both `"MONDAY"` and `"mon"` style values.
#[must_use]
pub fn normalize_day(value: &str) -> String {
    // Truncate by characters, not bytes; day names come from user input and
    // may be non-ASCII.
    value.to_lowercase().chars().take(3).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_parse_hour_minute_format() {
        let t = parse_at("07:30").unwrap();
        assert_eq!(t.hour(), 7);
        assert_eq!(t.minute(), 30);
    }

    #[test]
    fn should_parse_hour_minute_second_format() {
        let t = parse_at("22:15:45").unwrap();
        assert_eq!(t.hour(), 22);
        assert_eq!(t.minute(), 15);
        assert_eq!(t.second(), 45);
    }

    #[test]
    fn should_return_none_for_garbage_input() {
        assert!(parse_at("not a time").is_none());
        assert!(parse_at("25:99").is_none());
        assert!(parse_at("").is_none());
    }

    #[test]
    fn should_map_every_weekday_to_its_code() {
        assert_eq!(weekday_code(Weekday::Mon), "mon");
        assert_eq!(weekday_code(Weekday::Sun), "sun");
    }

    #[test]
    fn should_normalize_full_day_names() {
        assert_eq!(normalize_day("MONDAY"), "mon");
        assert_eq!(normalize_day("Friday"), "fri");
        assert_eq!(normalize_day("tue"), "tue");
    }

    #[test]
    fn should_truncate_multibyte_day_names_by_character() {
        assert_eq!(normalize_day("miércoles"), "mié");
        assert_eq!(normalize_day("Sábado"), "sáb");
        assert_eq!(normalize_day("日月"), "日月");
    }
}
