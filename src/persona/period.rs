//! Activation periods and date parsing.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// First day any element is active unless told otherwise.
pub const DEFAULT_START_DATE: &str = "1900-01-01";

/// Last day any element is active unless told otherwise.
pub const DEFAULT_END_DATE: &str = "2100-12-31";

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2100, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Parse a dashed ISO date (`YYYY-MM-DD`).
///
/// Only the exact ten-character form is accepted; `2025-1-1` and
/// `2025-01-01T00:00` are rejected like any other malformed input.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate {
        input: input.to_string(),
    };

    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())
}

/// Closed date interval during which an element or persona variant applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ActivePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a period from optional date strings, defaulting missing bounds.
    pub fn from_strs(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        let start = start.map(parse_date).transpose()?;
        let end = end.map(parse_date).transpose()?;
        Self::new(
            start.unwrap_or_else(default_start_date),
            end.unwrap_or_else(default_end_date),
        )
    }

    pub fn is_active(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn overlaps(&self, other: &ActivePeriod) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl Default for ActivePeriod {
    fn default() -> Self {
        Self {
            start: default_start_date(),
            end: default_end_date(),
        }
    }
}

impl fmt::Display for ActivePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}
