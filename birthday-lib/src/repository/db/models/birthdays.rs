use agdb::{DbElement, DbId};
use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::record::{Record, RecordId};

#[derive(Debug, Clone, DbElement, PartialEq)]
pub(crate) struct BirthdayModel {
    pub(crate) db_id: Option<DbId>,
    pub(crate) uid: u64,
    pub(crate) name: String,
    /// Lowercased copy of `name` that name searches match against
    pub(crate) search_name: String,
    pub(crate) birth_year: i64,
    pub(crate) birth_month: u64,
    pub(crate) birth_day: u64,
    pub(crate) notes: String,
}

impl BirthdayModel {
    /// Build a model from a record that has already passed validation.
    pub fn new(uid: RecordId, record: &Record, birth_date: NaiveDate) -> Self {
        Self {
            db_id: None,
            uid: uid.get(),
            name: record.name().to_string(),
            search_name: record.name().to_lowercase(),
            birth_year: i64::from(birth_date.year()),
            birth_month: u64::from(birth_date.month()),
            birth_day: u64::from(birth_date.day()),
            notes: record.notes().to_string(),
        }
    }

    /// A stored date that doesn't form a valid calendar date becomes a missing birth date, which
    /// the engine reports instead of scheduling.
    fn birth_date(&self) -> Option<NaiveDate> {
        let date = i32::try_from(self.birth_year).ok().and_then(|year| {
            let month = u32::try_from(self.birth_month).ok()?;
            let day = u32::try_from(self.birth_day).ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        });

        if date.is_none() {
            warn!(
                "Stored birthday {} has an invalid date {}-{}-{}",
                self.uid, self.birth_year, self.birth_month, self.birth_day
            );
        }

        date
    }
}

impl From<BirthdayModel> for Record {
    fn from(model: BirthdayModel) -> Self {
        let birth_date = model.birth_date();
        Record::stored(
            RecordId::from(model.uid),
            model.name,
            birth_date,
            model.notes,
        )
    }
}
