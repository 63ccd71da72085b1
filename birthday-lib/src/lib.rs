//! Birthday tracking core.
//!
//! Stored [`Record`]s come out of the [`Repository`], the [`Engine`] selects and orders them
//! against an explicit reference date, and every derived field ([`ScheduleView`]) is recomputed
//! per query.

pub mod error;
pub mod fs;
pub mod query;
pub mod record;
pub mod repository;
pub mod schedule;

pub use error::{Error, InvalidInput, Result};
pub use query::{Engine, Rejected, Scheduled, Selection, Summary, SummaryLine, Upcoming};
pub use record::{Record, RecordId};
pub use repository::Repository;
pub use schedule::{LeapDayPolicy, ScheduleView};
