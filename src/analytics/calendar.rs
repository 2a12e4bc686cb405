use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::AnalyticsError;
use crate::models::WeekStart;

/// Day, week and month boundaries shared by every date-based computation.
///
/// Instants are resolved to a calendar day in a fixed reference offset; weeks
/// start on `week_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
    week_start: WeekStart,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(offset: FixedOffset, week_start: WeekStart) -> Self {
        Self { offset, week_start }
    }

    /// UTC days, weeks starting on Sunday
    pub fn utc() -> Self {
        Self::new(Utc.fix(), WeekStart::Sunday)
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Calendar day of `at` in the reference offset. Saturates at the ends of
    /// the representable range.
    pub fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        let shift = self.offset.local_minus_utc();
        match at.checked_add_signed(TimeDelta::seconds(i64::from(shift))) {
            Some(local) => local.date_naive(),
            None if shift > 0 => NaiveDate::MAX,
            None => NaiveDate::MIN,
        }
    }

    /// Days elapsed since the start of the week, 0..=6
    pub fn weekday_index(&self, date: NaiveDate) -> u32 {
        let day = date.weekday().num_days_from_monday();
        let start = self.week_start.weekday().num_days_from_monday();
        (day + 7 - start) % 7
    }

    pub fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        date.checked_sub_days(Days::new(u64::from(self.weekday_index(date))))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.local_date(a) == self.local_date(b)
    }

    pub fn same_week(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.start_of_week(self.local_date(a)) == self.start_of_week(self.local_date(b))
    }

    pub fn same_month(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        CalendarMonth::containing(self.local_date(a)) == CalendarMonth::containing(self.local_date(b))
    }
}

/// A displayed calendar month, `YYYY-MM` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, AnalyticsError> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(AnalyticsError::InvalidMonth(format!("{:04}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Constructors only admit valid months
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days_in_month(&self) -> u32 {
        let next = self.next().first_day();
        (next - self.first_day()).num_days() as u32
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}

impl FromStr for CalendarMonth {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnalyticsError::InvalidMonth(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for CalendarMonth {
    type Error = AnalyticsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarMonth> for String {
    fn from(month: CalendarMonth) -> Self {
        month.to_string()
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
