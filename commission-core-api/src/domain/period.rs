use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// A (month, year) bucket used to group sales, commissions and payouts.
///
/// Ordering is chronological: year first, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn new(month: u32, year: i32) -> ApiResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ApiError::validation(format!(
                "period month {month} must be between 1 and 12"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Resolve a period from raw query values the way the sales pages do:
    /// missing or unparsable values fall back to `today`, and a month outside
    /// 1..=12 falls back to today's month.
    pub fn coerce(month: Option<&str>, year: Option<&str>, today: NaiveDate) -> Self {
        let month = month
            .and_then(|m| m.trim().parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m))
            .unwrap_or_else(|| today.month());
        let year = year
            .and_then(|y| y.trim().parse::<i32>().ok())
            .unwrap_or_else(|| today.year());
        Self { year, month }
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated on construction; day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next().first_day().pred_opt().unwrap_or(NaiveDate::MIN)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn month_i32(&self) -> i32 {
        self.month as i32
    }
}

/// First calendar day of the month after `date`; December rolls into
/// January of the following year.
pub fn first_day_of_next_month(date: NaiveDate) -> NaiveDate {
    Period::of(date).next().first_day()
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_first_day_of_next_month() {
        assert_eq!(first_day_of_next_month(date(2024, 3, 15)), date(2024, 4, 1));
        assert_eq!(first_day_of_next_month(date(2024, 1, 31)), date(2024, 2, 1));
        assert_eq!(first_day_of_next_month(date(2024, 3, 1)), date(2024, 4, 1));
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        assert_eq!(first_day_of_next_month(date(2023, 12, 31)), date(2024, 1, 1));
        assert_eq!(first_day_of_next_month(date(2023, 12, 1)), date(2024, 1, 1));
    }

    #[test]
    fn test_new_rejects_bad_month() {
        assert!(Period::new(0, 2024).is_err());
        assert!(Period::new(13, 2024).is_err());
        assert_eq!(Period::new(3, 2024).unwrap(), Period { year: 2024, month: 3 });
    }

    #[test]
    fn test_coerce_falls_back_to_today() {
        let today = date(2025, 7, 20);
        assert_eq!(Period::coerce(None, None, today), Period { year: 2025, month: 7 });
        assert_eq!(Period::coerce(Some("13"), Some("2024"), today), Period { year: 2024, month: 7 });
        assert_eq!(Period::coerce(Some("abc"), Some("x"), today), Period { year: 2025, month: 7 });
        assert_eq!(Period::coerce(Some(" 2 "), Some("2023"), today), Period { year: 2023, month: 2 });
    }

    #[test]
    fn test_last_day_and_contains() {
        let feb = Period::new(2, 2024).unwrap();
        assert_eq!(feb.last_day(), date(2024, 2, 29));
        assert!(feb.contains(date(2024, 2, 10)));
        assert!(!feb.contains(date(2023, 2, 10)));
    }

    #[test]
    fn test_ordering_and_display() {
        let a = Period::new(12, 2023).unwrap();
        let b = Period::new(1, 2024).unwrap();
        assert!(a < b);
        assert_eq!(a.to_string(), "12/2023");
    }
}
