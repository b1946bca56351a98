use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{DuesError, Result};
use crate::types::BillingFrequency;

/// fixed number of calendar days between period end and due date
pub const DUE_DATE_OFFSET_DAYS: i64 = 15;

/// due date for a billing period
///
/// currently period_end + 15 calendar days for every frequency; the
/// frequency parameter is accepted for forward compatibility but does not
/// vary the offset. this is a fixed business rule, not configuration.
pub fn due_date(period_end: NaiveDate, _frequency: BillingFrequency) -> NaiveDate {
    period_end + Duration::days(DUE_DATE_OFFSET_DAYS)
}

/// contiguous date range dues are calculated for once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DuesError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// the calendar month containing `date`, first through last day
    pub fn calendar_month(date: NaiveDate) -> Self {
        let start = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
            .expect("first of month is always valid");
        let end = match date.month() {
            12 => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1),
            m => NaiveDate::from_ymd_opt(date.year(), m + 1, 1),
        }
        .expect("first of next month is always valid")
            - Duration::days(1);
        Self { start, end }
    }
}
