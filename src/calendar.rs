use crate::keys::{DateKey, MonthKey};
use chrono::{Datelike, Local, Month, NaiveDate};
use serde::{Deserialize, Serialize};

pub const WEEKS: usize = 6;
pub const DAYS_PER_WEEK: usize = 7;
pub const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The month currently on screen. `month` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarView {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub day: u32,
    pub in_month: bool,
    pub date_key: DateKey,
}

/// Six Sunday-first weeks covering a month plus the overflow days around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub weeks: [[GridCell; DAYS_PER_WEEK]; WEEKS],
    pub month_key: MonthKey,
}

impl CalendarView {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (month < 12).then_some(Self { year, month })
    }

    pub fn today() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month0(),
        }
    }

    /// Steps back one month. The year saturates at `i32::MIN`.
    pub fn prev_month(self) -> Self {
        if self.month > 0 {
            return Self {
                month: self.month - 1,
                ..self
            };
        }
        match self.year.checked_sub(1) {
            Some(year) => Self { year, month: 11 },
            None => self,
        }
    }

    /// Steps forward one month. The year saturates at `i32::MAX`.
    pub fn next_month(self) -> Self {
        if self.month < 11 {
            return Self {
                month: self.month + 1,
                ..self
            };
        }
        match self.year.checked_add(1) {
            Some(year) => Self { year, month: 0 },
            None => self,
        }
    }

    pub fn grid(&self) -> MonthGrid {
        build_grid(self.year, self.month)
    }
}

impl MonthGrid {
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.weeks.iter().flatten()
    }
}

/// Builds the 6x7 grid for `month` (0-based) of `year`.
///
/// Months past 11 carry into the following years. Arithmetic runs on a day
/// count, so every `i32` year works, including overflow cells that fall in
/// a year beyond `i32::MAX`.
pub fn build_grid(year: i32, month: u32) -> MonthGrid {
    let absolute = i64::from(year) * 12 + i64::from(month);
    let year = absolute.div_euclid(12);
    let month = absolute.rem_euclid(12) as u32 + 1;

    let first = days_from_civil(year, month, 1);
    let last = first + i64::from(days_in_month(year, month)) - 1;
    let start = first - weekday_from_days(first);

    let weeks = std::array::from_fn(|row| {
        std::array::from_fn(|col| {
            let days = start + (row * DAYS_PER_WEEK + col) as i64;
            let (y, m, d) = civil_from_days(days);
            GridCell {
                day: d,
                in_month: (first..=last).contains(&days),
                date_key: DateKey {
                    year: y,
                    month: m,
                    day: d,
                },
            }
        })
    });

    MonthGrid {
        weeks,
        month_key: MonthKey { year, month },
    }
}

pub fn month_name(month0: u32) -> &'static str {
    month0
        .checked_add(1)
        .and_then(|m| u8::try_from(m).ok())
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// Long form used as the edit dialog title, e.g. `Wed, Jan 15, 2025`.
pub fn describe_day(key: &DateKey) -> String {
    i32::try_from(key.year)
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, key.month, key.day))
        .map(|date| date.format("%a, %b %-d, %Y").to_string())
        .unwrap_or_else(|| key.to_string())
}

pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Length of a 1-based month; 0 for a month outside 1..=12.
pub fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

// Days since 1970-01-01 in the proleptic Gregorian calendar.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let mp = i64::from((month + 9) % 12);
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

// Sunday = 0. 1970-01-01 was a Thursday.
fn weekday_from_days(days: i64) -> i64 {
    (days + 4).rem_euclid(7)
}
