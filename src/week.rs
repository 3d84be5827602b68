//! Pay weeks run Monday to Sunday and are keyed by a label such as
//! `2024-01-01 - 2024-01-07`.

use std::{fmt, str::FromStr};

use time::{macros::format_description, Date, Duration, OffsetDateTime, Weekday};

const LABEL_SEPARATOR: &str = " - ";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WeekLabelError {
    #[error("week label must look like YYYY-MM-DD - YYYY-MM-DD")]
    Malformed,
    #[error("invalid date in week label: {0}")]
    InvalidDate(String),
    #[error("week must start on a Monday, got {0}")]
    NotMonday(Date),
    #[error("week must end six days after it starts")]
    WrongLength,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeekRange {
    monday: Date,
}

impl WeekRange {
    pub fn containing(date: Date) -> Self {
        let back = i64::from(date.weekday().number_days_from_monday());
        Self {
            monday: date - Duration::days(back),
        }
    }

    pub fn current() -> Self {
        Self::containing(OffsetDateTime::now_utc().date())
    }

    pub fn parse(label: &str) -> Result<Self, WeekLabelError> {
        let (start, end) = label
            .trim()
            .split_once(LABEL_SEPARATOR)
            .ok_or(WeekLabelError::Malformed)?;
        let monday = parse_date(start)?;
        let sunday = parse_date(end)?;
        if monday.weekday() != Weekday::Monday {
            return Err(WeekLabelError::NotMonday(monday));
        }
        if sunday - monday != Duration::days(6) {
            return Err(WeekLabelError::WrongLength);
        }
        Ok(Self { monday })
    }

    pub fn monday(&self) -> Date {
        self.monday
    }

    pub fn sunday(&self) -> Date {
        self.monday + Duration::days(6)
    }

    pub fn label(&self) -> String {
        self.to_string()
    }

    /// The seven dates of the week, Monday first.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let monday = self.monday;
        (0..7).map(move |i| monday + Duration::days(i))
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.monday, LABEL_SEPARATOR, self.sunday())
    }
}

impl FromStr for WeekRange {
    type Err = WeekLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Key used for a weekday in the structured work-hours payload. The web client
/// indexes days by their Albanian names.
pub fn day_key(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "E hënë",
        Weekday::Tuesday => "E martë",
        Weekday::Wednesday => "E mërkurë",
        Weekday::Thursday => "E enjte",
        Weekday::Friday => "E premte",
        Weekday::Saturday => "E shtunë",
        Weekday::Sunday => "E diel",
    }
}

/// Inverse of [`day_key`].
pub fn weekday_from_key(key: &str) -> Option<Weekday> {
    [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ]
    .into_iter()
    .find(|d| day_key(*d) == key.trim())
}

fn parse_date(s: &str) -> Result<Date, WeekLabelError> {
    Date::parse(s.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| WeekLabelError::InvalidDate(s.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn monday_maps_to_its_own_week() {
        let week = WeekRange::containing(date!(2024 - 01 - 01));
        assert_eq!(week.label(), "2024-01-01 - 2024-01-07");
    }

    #[test]
    fn sunday_maps_back_to_previous_monday() {
        let week = WeekRange::containing(date!(2024 - 01 - 07));
        assert_eq!(week.label(), "2024-01-01 - 2024-01-07");
    }

    #[test]
    fn label_is_stable_across_the_week() {
        let monday = date!(2025 - 08 - 04);
        let expected = WeekRange::containing(monday);
        for i in 0..7 {
            let d = monday + Duration::days(i);
            assert_eq!(WeekRange::containing(d), expected, "day {d}");
        }
        assert_ne!(WeekRange::containing(monday + Duration::days(7)), expected);
    }

    #[test]
    fn every_week_runs_monday_to_sunday() {
        let mut d = date!(2023 - 12 - 20);
        while d < date!(2024 - 03 - 10) {
            let week = WeekRange::containing(d);
            assert_eq!(week.monday().weekday(), Weekday::Monday);
            assert_eq!(week.sunday().weekday(), Weekday::Sunday);
            assert_eq!(week.sunday() - week.monday(), Duration::days(6));
            assert!(week.monday() <= d && d <= week.sunday());
            d += Duration::days(1);
        }
    }

    #[test]
    fn crosses_year_and_month_boundaries() {
        assert_eq!(
            WeekRange::containing(date!(2025 - 01 - 01)).label(),
            "2024-12-30 - 2025-01-05"
        );
        assert_eq!(
            WeekRange::containing(date!(2024 - 03 - 01)).label(),
            "2024-02-26 - 2024-03-03"
        );
    }

    #[test]
    fn parse_accepts_what_display_produces() {
        let week: WeekRange = "2025-08-04 - 2025-08-10".parse().unwrap();
        assert_eq!(week.monday(), date!(2025 - 08 - 04));
        assert_eq!(week.sunday(), date!(2025 - 08 - 10));
    }

    #[test]
    fn parse_rejects_bad_labels() {
        assert_eq!(WeekRange::parse("2025-08-04"), Err(WeekLabelError::Malformed));
        assert!(matches!(
            WeekRange::parse("2025-13-04 - 2025-08-10"),
            Err(WeekLabelError::InvalidDate(_))
        ));
        assert!(matches!(
            WeekRange::parse("2025-08-05 - 2025-08-11"),
            Err(WeekLabelError::NotMonday(_))
        ));
        assert_eq!(
            WeekRange::parse("2025-08-04 - 2025-08-11"),
            Err(WeekLabelError::WrongLength)
        );
    }

    #[test]
    fn days_run_monday_first() {
        let week = WeekRange::containing(date!(2024 - 01 - 03));
        let days: Vec<_> = week.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], date!(2024 - 01 - 01));
        assert_eq!(days[6], date!(2024 - 01 - 07));
    }

    #[test]
    fn labels_sort_chronologically() {
        let a = WeekRange::containing(date!(2024 - 12 - 30)).label();
        let b = WeekRange::containing(date!(2025 - 01 - 06)).label();
        assert!(a < b);
    }

    #[test]
    fn day_keys_round_trip() {
        assert_eq!(day_key(Weekday::Monday), "E hënë");
        assert_eq!(weekday_from_key("E diel"), Some(Weekday::Sunday));
        assert_eq!(weekday_from_key("Sunday"), None);
    }
}
