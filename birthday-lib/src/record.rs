//! The stored entity the engine schedules.

use chrono::NaiveDate;
use derive_more::{Display, From};
use getset::CopyGetters;

use crate::error::InvalidInput;

/// Identifier assigned by the [`Repository`](crate::Repository) when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, From, Display)]
pub struct RecordId(u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A person, their birth date and optional notes.
///
/// A [`Record`] is a snapshot: editing one only produces a new value, the store is changed through
/// the [`Repository`](crate::Repository).
#[derive(Debug, Clone, PartialEq, Eq, CopyGetters)]
pub struct Record {
    /// `None` until the record has been stored
    #[getset(get_copy = "pub")]
    id: Option<RecordId>,
    name: String,
    #[getset(get_copy = "pub")]
    birth_date: Option<NaiveDate>,
    notes: String,
}

impl Record {
    /// Create a draft that has not been stored yet. The name and notes are trimmed; no validation
    /// happens here, see [`Record::validate`].
    pub fn new(name: &str, birth_date: Option<NaiveDate>, notes: Option<&str>) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
            birth_date,
            notes: notes.map(str::trim).unwrap_or_default().to_string(),
        }
    }

    pub(crate) fn stored(
        id: RecordId,
        name: String,
        birth_date: Option<NaiveDate>,
        notes: String,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            birth_date,
            notes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form notes, empty when none were given
    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.trim().to_string();
        self
    }

    pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = notes.trim().to_string();
        self
    }

    /// Check that this record can be scheduled, returning its birth date.
    pub fn validate(&self) -> Result<NaiveDate, InvalidInput> {
        if self.name.is_empty() {
            return Err(InvalidInput::EmptyName);
        }

        self.birth_date.ok_or(InvalidInput::MissingBirthDate)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_trims_and_defaults_notes() {
        let record = Record::new("  Ada Lovelace ", Some(date(1815, 12, 10)), None);

        assert_eq!(record.id(), None);
        assert_eq!(record.name(), "Ada Lovelace");
        assert_eq!(record.notes(), "");
    }

    #[test]
    fn test_validate() {
        let record = Record::new("Ada", Some(date(1815, 12, 10)), Some("math"));

        assert_eq!(record.validate(), Ok(date(1815, 12, 10)));
    }

    #[test]
    fn test_validate_empty_name() {
        let record = Record::new("   ", Some(date(1815, 12, 10)), None);

        assert_eq!(record.validate(), Err(InvalidInput::EmptyName));
    }

    #[test]
    fn test_validate_missing_birth_date() {
        let record = Record::new("Ada", None, None);

        assert_eq!(record.validate(), Err(InvalidInput::MissingBirthDate));
    }

    #[test]
    fn test_with_fields() {
        let record = Record::new("Ada", None, None)
            .with_name(" Grace ")
            .with_birth_date(date(1906, 12, 9))
            .with_notes("compilers");

        assert_eq!(record.name(), "Grace");
        assert_eq!(record.birth_date(), Some(date(1906, 12, 9)));
        assert_eq!(record.notes(), "compilers");
    }
}
