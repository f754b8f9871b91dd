//! Reporting window for one bulletin run.

use chrono::{Days, Local, NaiveDate};

/// Number of days after today covered by the bulletin (today..=today+4).
pub const OUTLOOK_SPAN_DAYS: u64 = 4;

/// Dates shared by the prompt and the rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateContext {
    /// Day 1 of the outlook
    pub today: NaiveDate,
    /// "March 1, 2024 - March 5, 2024"
    pub header_range: String,
    /// "Friday, March 1, 2024"
    pub context_label: String,
}

impl DateContext {
    /// Build the context for the local wall-clock date.
    #[must_use]
    pub fn today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    #[must_use]
    pub fn for_date(today: NaiveDate) -> Self {
        let last = today
            .checked_add_days(Days::new(OUTLOOK_SPAN_DAYS))
            .unwrap_or(NaiveDate::MAX);

        Self {
            today,
            header_range: format!("{} - {}", long_date(today), long_date(last)),
            context_label: today.format("%A, %B %-d, %Y").to_string(),
        }
    }

    /// Calendar date of outlook day `n`, where day 1 is today.
    ///
    /// Returns `None` only when the result leaves chrono's representable range.
    #[must_use]
    pub fn outlook_day(&self, n: u64) -> Option<NaiveDate> {
        if n == 0 {
            self.today.checked_sub_days(Days::new(1))
        } else {
            self.today.checked_add_days(Days::new(n - 1))
        }
    }
}

/// "March 1, 2024"
#[must_use]
pub fn long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// "Sat, Mar 2"
#[must_use]
pub fn short_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}
