use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar-date window applied while loading.
///
/// A timestamp is inside the window when its UTC calendar day is, i.e.
/// anywhere from `start 00:00:00` up to the last instant of `end`.
/// A window whose start is after its end contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn contains_time(&self, time: DateTime<Utc>) -> bool {
        self.contains(time.date_naive())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, d).unwrap()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let range = DateRange::new(date(1, 1), date(1, 31));
        assert!(range.contains(date(1, 1)));
        assert!(range.contains(date(1, 31)));
        assert!(!range.contains(date(2, 1)));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2022, 12, 31).unwrap()));
    }

    #[test]
    fn test_end_day_includes_last_instant() {
        let range = DateRange::new(date(1, 1), date(1, 31));
        let late = Utc.with_ymd_and_hms(2023, 1, 31, 23, 59, 59).unwrap();
        let next = Utc.with_ymd_and_hms(2023, 2, 1, 0, 0, 0).unwrap();
        assert!(range.contains_time(late));
        assert!(!range.contains_time(next));
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(date(2, 1), date(1, 1));
        assert!(range.is_empty());
        assert!(!range.contains(date(1, 15)));
    }
}
