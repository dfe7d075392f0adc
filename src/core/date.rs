//! Archive dates and their page-URL encoding.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::consts::{DATE_FORMAT, FIRST_APOD_DATE};
use crate::error::AppError;

/// Current date in the timezone the archive publishes in (US Eastern).
pub(crate) fn apod_today() -> NaiveDate {
    Utc::now()
        .with_timezone(&chrono_tz::America::New_York)
        .date_naive()
}

/// A calendar date known to be inside the archive range
/// (1995-06-16 through `today`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct ApodDate(NaiveDate);

impl ApodDate {
    pub(crate) fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, AppError> {
        let key = (date.year(), date.month(), date.day());
        if key < FIRST_APOD_DATE || date > today {
            return Err(AppError::DateOutOfRange {
                date: date.format(DATE_FORMAT).to_string(),
                today: today.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self(date))
    }

    #[cfg(test)]
    pub(crate) fn from_ymd(
        year: i32,
        month: u32,
        day: u32,
        today: NaiveDate,
    ) -> Result<Self, AppError> {
        let date =
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| AppError::InvalidDate {
                input: format!("{year:04}-{month:02}-{day:02}"),
            })?;
        Self::new(date, today)
    }

    /// Parse user input (see [`crate::utils::parse_date`]) and range-check it.
    pub(crate) fn parse(input: &str, today: NaiveDate) -> Result<Self, AppError> {
        let date = crate::utils::parse_date(input, today)?;
        Self::new(date, today)
    }

    pub(crate) fn today() -> Self {
        Self(apod_today())
    }

    pub(crate) fn fragment(self) -> DateFragment {
        DateFragment::from_date(self.0)
    }
}

impl fmt::Display for ApodDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for ApodDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `YYMMDD`: two-digit year, zero-padded month and day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DateFragment(String);

impl DateFragment {
    pub(crate) fn from_date(date: NaiveDate) -> Self {
        Self(format!(
            "{:02}{:02}{:02}",
            date.year().rem_euclid(100),
            date.month(),
            date.day()
        ))
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
