//! Date window used to filter expenses
//!
//! An explicit start/end range takes precedence over the month and year
//! selectors: when either bound is set, month and year are ignored even if
//! they are also set.

use chrono::{Datelike, NaiveDate};

/// Effective date constraint derived from the filter criteria
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateWindow {
    /// Inclusive range; a missing bound is open
    Range {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
    /// Calendar selectors; `None` means "all"
    Calendar { month: Option<u32>, year: Option<i32> },
}

impl Default for DateWindow {
    fn default() -> Self {
        DateWindow::Calendar {
            month: None,
            year: None,
        }
    }
}

impl DateWindow {
    /// Pick the window for the given selectors
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Self {
        if start.is_some() || end.is_some() {
            DateWindow::Range { start, end }
        } else {
            DateWindow::Calendar { month, year }
        }
    }

    /// Check if a date is within the window
    pub fn contains(&self, date: &NaiveDate) -> bool {
        match *self {
            DateWindow::Range { start, end } => match (start, end) {
                (None, None) => true,
                (Some(s), None) => *date >= s,
                (None, Some(e)) => *date <= e,
                (Some(s), Some(e)) => *date >= s && *date <= e,
            },
            DateWindow::Calendar { month, year } => {
                month.map_or(true, |m| date.month() == m) && year.map_or(true, |y| date.year() == y)
            }
        }
    }

    /// Get a human-readable description of the window
    pub fn description(&self) -> String {
        match *self {
            DateWindow::Range { start, end } => match (start, end) {
                (Some(s), Some(e)) => format!("{} to {}", s, e),
                (Some(s), None) => format!("From {}", s),
                (None, Some(e)) => format!("Until {}", e),
                (None, None) => "All Time".to_string(),
            },
            DateWindow::Calendar { month, year } => match (month, year) {
                (None, None) => "All Time".to_string(),
                (Some(m), None) => format!("{} (every year)", month_name(m)),
                (None, Some(y)) => format!("{}", y),
                (Some(m), Some(y)) => format!("{} {}", month_name(m), y),
            },
        }
    }
}

fn month_name(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format("%B").to_string())
        .unwrap_or_else(|| format!("Month {}", month))
}

/// Parse a month selector: `all` or a calendar month number.
///
/// Out-of-range numbers are accepted and simply match nothing.
pub fn parse_month_selector(value: &str) -> Result<Option<u32>, String> {
    parse_selector(value)
}

/// Parse a year selector: `all` or a four-digit year
pub fn parse_year_selector(value: &str) -> Result<Option<i32>, String> {
    parse_selector(value)
}

fn parse_selector<T: std::str::FromStr>(value: &str) -> Result<Option<T>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|_| format!("Expected 'all' or a number, got '{}'", value))
}
