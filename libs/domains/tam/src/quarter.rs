//! Calendar quarter arithmetic.
//!
//! Labels have the form `Q<n>-<year>` where n is 1 to 4 and the year has
//! four digits. Q1 covers January to March, Q4 ends on December 31.

use chrono::{Datelike, NaiveDate, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::{TamError, TamResult};
use crate::models::TimeWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quarter {
    number: u8,
    year: i32,
    window: TimeWindow,
}

impl Quarter {
    pub fn new(number: u8, year: i32) -> TamResult<Self> {
        if !(1..=4).contains(&number) || year <= 0 {
            return Err(TamError::InvalidQuarterLabel(format!("Q{}-{}", number, year)));
        }
        let (start, end) = bounds(number, year)
            .ok_or_else(|| TamError::InvalidQuarterLabel(format!("Q{}-{}", number, year)))?;
        Ok(Self {
            number,
            year,
            window: TimeWindow::new(start, end)?,
        })
    }

    /// Parses a `Q[1-4]-YYYY` label.
    pub fn parse(label: &str) -> TamResult<Self> {
        let invalid = || TamError::InvalidQuarterLabel(label.to_string());

        let (quarter, year) = label
            .strip_prefix('Q')
            .and_then(|rest| rest.split_once('-'))
            .ok_or_else(invalid)?;

        if quarter.len() != 1 || year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let number: u8 = quarter.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(number, year).map_err(|_| invalid())
    }

    /// The quarter a date falls in.
    pub fn containing(date: NaiveDate) -> TamResult<Self> {
        let number = (date.month0() / 3 + 1) as u8;
        Self::new(number, date.year())
    }

    pub fn current() -> TamResult<Self> {
        Self::containing(Utc::now().date_naive())
    }

    /// Parses `label` when given, otherwise the quarter containing `today`.
    pub fn resolve(label: Option<&str>, today: NaiveDate) -> TamResult<Self> {
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => Self::parse(label),
            None => Self::containing(today),
        }
    }

    /// Q1 of a year is preceded by Q4 of the year before.
    pub fn previous(&self) -> TamResult<Self> {
        match self.number {
            1 => Self::new(4, self.year - 1),
            n => Self::new(n - 1, self.year),
        }
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn label(&self) -> String {
        self.to_string()
    }
}

fn bounds(number: u8, year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let first_month = u32::from(number - 1) * 3 + 1;
    let start = NaiveDate::from_ymd_opt(year, first_month, 1)?;
    let next_start = if number == 4 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, first_month + 3, 1)?
    };
    Some((start, next_start.pred_opt()?))
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}-{:04}", self.number, self.year)
    }
}

impl FromStr for Quarter {
    type Err = TamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
