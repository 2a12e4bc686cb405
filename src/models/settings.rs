use chrono::{FixedOffset, Weekday};
use serde::{Deserialize, Serialize};

use crate::analytics::Calendar;

/// First day of the calendar week used by the weekly filter and the month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WeekStart::Sunday => "SUNDAY",
            WeekStart::Monday => "MONDAY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "SUNDAY" => Some(WeekStart::Sunday),
            "MONDAY" => Some(WeekStart::Monday),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub id: i32,
    pub currency: String,
    pub week_start: WeekStart,
    /// Offset of the reference calendar from UTC
    pub utc_offset_minutes: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Settings {
    /// Calendar convention the analytics use for day, week and month boundaries
    pub fn calendar(&self) -> Result<Calendar, String> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .ok_or_else(|| format!("Invalid UTC offset: {} minutes", self.utc_offset_minutes))?;
        Ok(Calendar::new(offset, self.week_start))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsInput {
    pub currency: Option<String>,
    pub week_start: Option<WeekStart>,
    pub utc_offset_minutes: Option<i32>,
}
