//! Monthly date windows
//!
//! The search API takes inclusive `begin_date`/`end_date` bounds in
//! `YYYYMMDD` form. An export is split into one window per calendar month.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fmt;

const DATE_FORMAT: &str = "%Y%m%d";

/// Inclusive pair of boundary dates, each formatted as `YYYYMMDD`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DateWindow {
    start: String,
    end: String,
}

impl DateWindow {
    /// Window covering every day of the given month
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMonth`] when `month` is outside 1..=12, and a
    /// configuration error when the year is outside chrono's supported range.
    ///
    /// # Examples
    ///
    /// ```
    /// use nytcrawler::date::DateWindow;
    ///
    /// let feb = DateWindow::month(2016, 2).unwrap();
    /// assert_eq!(feb.start(), "20160201");
    /// assert_eq!(feb.end(), "20160229");
    /// ```
    pub fn month(year: u32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(month));
        }

        let year = i32::try_from(year)
            .map_err(|_| Error::config("years", format!("year {year} out of range")))?;
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| Error::config("years", format!("year {year} out of range")))?;
        let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
            .ok_or_else(|| Error::config("years", format!("year {year} out of range")))?;

        Ok(Self {
            start: first.format(DATE_FORMAT).to_string(),
            end: last.format(DATE_FORMAT).to_string(),
        })
    }

    /// First day of the window (`YYYYMMDD`)
    pub fn start(&self) -> &str {
        &self.start
    }

    /// Last day of the window (`YYYYMMDD`)
    pub fn end(&self) -> &str {
        &self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}
