//! Derivation of a record's next occurrence, upcoming age and same-day flag.

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::{error::InvalidInput, record::Record};

/// Where a February 29 birthday is observed in a year that has no February 29.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display,
)]
pub enum LeapDayPolicy {
    /// Observe it on February 28
    #[default]
    #[serde(rename = "feb-28")]
    #[strum(to_string = "feb-28")]
    #[value(name = "feb-28")]
    Feb28,
    /// Observe it on March 1
    #[serde(rename = "mar-1")]
    #[strum(to_string = "mar-1")]
    #[value(name = "mar-1")]
    Mar1,
}

impl LeapDayPolicy {
    /// The date on which a person born on `birth_date` has their birthday in `year`.
    ///
    /// Returns `None` only when `year` is outside the range [`NaiveDate`] can represent.
    pub fn occurrence(self, birth_date: NaiveDate, year: i32) -> Option<NaiveDate> {
        birth_date.with_year(year).or_else(|| match self {
            // Only February 29 fails to move into a common year
            LeapDayPolicy::Feb28 => NaiveDate::from_ymd_opt(year, 2, 28),
            LeapDayPolicy::Mar1 => NaiveDate::from_ymd_opt(year, 3, 1),
        })
    }
}

/// Fields derived from a [`Record`] and a reference date. Never stored, since they are only
/// meaningful for the `today` they were computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct ScheduleView {
    /// Earliest occurrence on or after `today`
    next_occurrence: NaiveDate,
    /// The age reached on `next_occurrence`
    upcoming_age: i32,
    is_today: bool,
    /// Whole days from `today` until `next_occurrence`
    days_until: i64,
}

impl ScheduleView {
    /// Derive the view of `record` as seen on `today`.
    ///
    /// Fails if the record has no name or no birth date.
    pub fn derive(
        record: &Record,
        today: NaiveDate,
        policy: LeapDayPolicy,
    ) -> Result<Self, InvalidInput> {
        let birth_date = record.validate()?;
        Self::from_birth_date(birth_date, today, policy)
    }

    pub fn from_birth_date(
        birth_date: NaiveDate,
        today: NaiveDate,
        policy: LeapDayPolicy,
    ) -> Result<Self, InvalidInput> {
        let this_year = policy
            .occurrence(birth_date, today.year())
            .ok_or(InvalidInput::DateOutOfRange)?;

        // A birthday that falls on `today` stays on `today`
        let next_occurrence = if this_year < today {
            let next_year = today
                .year()
                .checked_add(1)
                .ok_or(InvalidInput::DateOutOfRange)?;
            policy
                .occurrence(birth_date, next_year)
                .ok_or(InvalidInput::DateOutOfRange)?
        } else {
            this_year
        };

        Ok(Self {
            next_occurrence,
            upcoming_age: next_occurrence.year() - birth_date.year(),
            is_today: next_occurrence == today,
            days_until: next_occurrence.signed_duration_since(today).num_days(),
        })
    }
}
