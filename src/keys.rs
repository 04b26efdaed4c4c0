use crate::calendar::days_in_month;
use std::fmt;

/// A local calendar day, rendered as `YYYY-MM-DD`.
///
/// `month` is 1-based. Years before 1 CE render with a leading `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey {
    pub year: i64,
    pub month: u32,
    pub day: u32,
}

/// A calendar month, rendered as `YYYY-MM` (1-based month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i64,
    pub month: u32,
}

impl DateKey {
    pub fn new(year: i64, month: u32, day: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Parses the canonical rendering only; `2025-1-5` is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let (negative, rest) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let mut parts = rest.split('-');
        let year = parse_digits(parts.next()?)?;
        let month = parse_digits(parts.next()?)?;
        let day = parse_digits(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }

        let year = if negative { -year } else { year };
        let key = Self::new(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)?;
        (key.to_string() == raw).then_some(key)
    }

    /// The month this day belongs to, independent of any displayed month.
    pub fn month_key(&self) -> MonthKey {
        MonthKey {
            year: self.year,
            month: self.month,
        }
    }
}

impl MonthKey {
    pub fn parse(raw: &str) -> Option<Self> {
        let (negative, rest) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (year, month) = rest.split_once('-')?;
        let year = parse_digits(year)?;
        let month = u32::try_from(parse_digits(month)?).ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }

        let key = Self {
            year: if negative { -year } else { year },
            month,
        };
        (key.to_string() == raw).then_some(key)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

fn parse_digits(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
