use thiserror::Error;

use crate::record::RecordId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error("No birthday record with id {0}")]
    NotFound(RecordId),
    #[error("Internal database error {0}")]
    Storage(#[from] agdb::DbError),
    #[error("The database was written by a newer version (model version {found}, supported {supported})")]
    UnsupportedModelVersion { found: u64, supported: u64 },
    #[error("Failed to read configuration: {0}")]
    ConfigRead(#[from] toml::de::Error),
    #[error("Failed to write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Local validation failures. These are reported to the caller and the offending record or
/// argument never reaches the scheduling computation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("A name is required")]
    EmptyName,
    #[error("A birth date is required")]
    MissingBirthDate,
    #[error("Month {0} is not between 1 and 12")]
    MonthOutOfRange(u32),
    #[error("The next occurrence falls outside the supported calendar range")]
    DateOutOfRange,
}
