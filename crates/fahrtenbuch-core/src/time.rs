use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

use crate::error::{FleetError, FleetResult};

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Parses a logbook date in `YYYY-MM-DD` form.
pub fn parse_trip_date(value: &str) -> FleetResult<Date> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|e| FleetError::validation(format!("invalid trip date '{value}': {e}")))
}

/// Parses a wall-clock time in `HH:MM` form.
pub fn parse_clock_time(value: &str) -> FleetResult<Time> {
    Time::parse(value, format_description!("[hour]:[minute]"))
        .map_err(|e| FleetError::validation(format!("invalid time '{value}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        let date = parse_trip_date("2024-03-01").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(u8::from(date.month()), 3);
        assert!(parse_trip_date("01.03.2024").is_err());
        assert!(parse_trip_date("2024-02-30").is_err());
    }

    #[test]
    fn parses_clock_times() {
        let t = parse_clock_time("08:30").unwrap();
        assert_eq!((t.hour(), t.minute()), (8, 30));
        assert!(parse_clock_time("25:00").is_err());
        assert!(parse_clock_time("8h30").is_err());
    }
}
