//! Selection, ordering and grouping over a snapshot of [`Record`]s.
//!
//! Every operation borrows the caller's snapshot and returns a new collection. The reference
//! date is always passed in, so one query sees a single consistent "today".

use std::fmt::{self, Display, Formatter};

use chrono::{Datelike, NaiveDate};
use tracing::trace;

use crate::{
    error::InvalidInput,
    record::Record,
    schedule::{LeapDayPolicy, ScheduleView},
};

/// Which records a query starts from. Only one mode is active at a time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    /// Case-insensitive substring of the name
    Name(String),
    /// Birth month, 1 through 12
    Month(u32),
}

impl Selection {
    /// Pick the selection from the inputs a user filled in: a non-blank name query wins over a
    /// month, and with neither every record is selected.
    pub fn from_inputs(query: Option<&str>, month: Option<u32>) -> Self {
        match (query.map(str::trim).filter(|q| !q.is_empty()), month) {
            (Some(query), _) => Selection::Name(query.to_string()),
            (None, Some(month)) => Selection::Month(month),
            (None, None) => Selection::All,
        }
    }
}

/// A record together with its derived view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled<'a> {
    pub record: &'a Record,
    pub view: ScheduleView,
}

/// A record that could not be scheduled and why
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected<'a> {
    pub record: &'a Record,
    pub reason: InvalidInput,
}

/// Records ordered by how soon their birthday comes around, plus the records that were refused.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Upcoming<'a> {
    pub scheduled: Vec<Scheduled<'a>>,
    pub rejected: Vec<Rejected<'a>>,
}

impl<'a> Upcoming<'a> {
    pub fn records(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.scheduled.iter().map(|s| s.record)
    }
}

/// One row of the upcoming birthdays report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLine<'a> {
    pub name: &'a str,
    pub next_occurrence: NaiveDate,
    pub upcoming_age: i32,
}

impl Display for SummaryLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (turns {})",
            self.name,
            self.next_occurrence.format("%Y-%m-%d"),
            self.upcoming_age
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary<'a> {
    pub lines: Vec<SummaryLine<'a>>,
    pub rejected: Vec<Rejected<'a>>,
}

/// The birthday query engine.
///
/// Holds nothing but the [`LeapDayPolicy`], so it can be copied freely and shared between
/// callers working on independent snapshots.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    leap_day: LeapDayPolicy,
}

impl Engine {
    pub fn new(leap_day: LeapDayPolicy) -> Self {
        Self { leap_day }
    }

    pub fn leap_day(&self) -> LeapDayPolicy {
        self.leap_day
    }

    pub fn list_all<'a>(&self, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().collect()
    }

    /// Case-insensitive substring match on the name. A blank query selects everything.
    pub fn search_by_name<'a>(&self, records: &'a [Record], query: &str) -> Vec<&'a Record> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.list_all(records);
        }

        records
            .iter()
            .filter(|r| r.name().to_lowercase().contains(&query))
            .collect()
    }

    /// Records born in `month`.
    ///
    /// Records without a birth date are kept so that scheduling reports them instead of them
    /// vanishing from the result.
    pub fn search_by_month<'a>(
        &self,
        records: &'a [Record],
        month: u32,
    ) -> Result<Vec<&'a Record>, InvalidInput> {
        validate_month(month)?;

        Ok(records
            .iter()
            .filter(|r| r.birth_date().is_none_or(|d| d.month() == month))
            .collect())
    }

    pub fn select<'a>(
        &self,
        records: &'a [Record],
        selection: &Selection,
    ) -> Result<Vec<&'a Record>, InvalidInput> {
        trace!("Selecting {selection:?} from {} records", records.len());

        match selection {
            Selection::All => Ok(self.list_all(records)),
            Selection::Name(query) => Ok(self.search_by_name(records, query)),
            Selection::Month(month) => self.search_by_month(records, *month),
        }
    }

    /// Derive every record's view against `today` and order by next occurrence. Records sharing
    /// a next occurrence keep their input order.
    pub fn order_by_upcoming<'a, I>(&self, records: I, today: NaiveDate) -> Upcoming<'a>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut upcoming = Upcoming::default();

        for record in records {
            match ScheduleView::derive(record, today, self.leap_day) {
                Ok(view) => upcoming.scheduled.push(Scheduled { record, view }),
                Err(reason) => upcoming.rejected.push(Rejected { record, reason }),
            }
        }

        // `sort_by_key` is stable
        upcoming.scheduled.sort_by_key(|s| s.view.next_occurrence());

        upcoming
    }

    /// The records whose birthday is `today`
    pub fn todays_birthdays<'a, I>(&self, records: I, today: NaiveDate) -> Upcoming<'a>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut upcoming = self.order_by_upcoming(records, today);
        upcoming.scheduled.retain(|s| s.view.is_today());
        upcoming
    }

    pub fn summarize<'a, I>(&self, records: I, today: NaiveDate) -> Summary<'a>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let Upcoming {
            scheduled,
            rejected,
        } = self.order_by_upcoming(records, today);

        Summary {
            lines: scheduled
                .into_iter()
                .map(|s| SummaryLine {
                    name: s.record.name(),
                    next_occurrence: s.view.next_occurrence(),
                    upcoming_age: s.view.upcoming_age(),
                })
                .collect(),
            rejected,
        }
    }
}

pub(crate) fn validate_month(month: u32) -> Result<(), InvalidInput> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(InvalidInput::MonthOutOfRange(month))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(name: &str, birth_date: NaiveDate) -> Record {
        Record::new(name, Some(birth_date), None)
    }

    fn names<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<&'a str> {
        records.into_iter().map(Record::name).collect()
    }

    fn sample() -> Vec<Record> {
        vec![
            record("Ada Lovelace", date(1815, 12, 10)),
            record("Alan Turing", date(1912, 6, 23)),
            record("Grace Hopper", date(1906, 12, 9)),
            record("Edsger Dijkstra", date(1930, 5, 11)),
        ]
    }

    #[test]
    fn test_search_by_name_is_case_insensitive() {
        let records = sample();
        let engine = Engine::default();

        assert_eq!(
            names(engine.search_by_name(&records, "ALAN")),
            ["Alan Turing"]
        );
        assert_eq!(
            names(engine.search_by_name(&records, "er")),
            ["Grace Hopper", "Edsger Dijkstra"]
        );
        assert!(engine.search_by_name(&records, "zuse").is_empty());
    }

    #[test]
    fn test_search_by_name_empty_query_lists_all() {
        let records = sample();
        let engine = Engine::default();

        assert_eq!(
            engine.search_by_name(&records, ""),
            engine.list_all(&records)
        );
        assert_eq!(
            engine.search_by_name(&records, "   "),
            engine.list_all(&records)
        );
    }

    #[test]
    fn test_search_by_month() {
        let records = sample();
        let engine = Engine::default();

        assert_eq!(
            names(engine.search_by_month(&records, 12).unwrap()),
            ["Ada Lovelace", "Grace Hopper"]
        );
        assert!(engine.search_by_month(&records, 1).unwrap().is_empty());
    }

    #[test]
    fn test_search_by_month_out_of_range() {
        let records = sample();
        let engine = Engine::default();

        assert_eq!(
            engine.search_by_month(&records, 0),
            Err(InvalidInput::MonthOutOfRange(0))
        );
        assert_eq!(
            engine.search_by_month(&records, 13),
            Err(InvalidInput::MonthOutOfRange(13))
        );
    }

    #[test]
    fn test_search_by_month_keeps_records_without_birth_date() {
        let records = vec![
            record("Ada Lovelace", date(1815, 12, 10)),
            Record::new("Unknown", None, None),
        ];
        let engine = Engine::default();

        let selected = engine.search_by_month(&records, 12).unwrap();
        let upcoming = engine.order_by_upcoming(selected, date(2024, 1, 1));

        assert_eq!(names(upcoming.records()), ["Ada Lovelace"]);
        assert_eq!(upcoming.rejected.len(), 1);
    }

    #[test]
    fn test_selection_precedence() {
        assert_eq!(
            Selection::from_inputs(Some(" ada "), Some(5)),
            Selection::Name("ada".into())
        );
        assert_eq!(
            Selection::from_inputs(Some("  "), Some(5)),
            Selection::Month(5)
        );
        assert_eq!(Selection::from_inputs(None, None), Selection::All);
    }

    #[test]
    fn test_select_then_order() {
        let records = sample();
        let engine = Engine::default();
        let today = date(2024, 12, 9);

        let selected = engine
            .select(&records, &Selection::Month(12))
            .unwrap();
        let upcoming = engine.order_by_upcoming(selected, today);

        assert_eq!(names(upcoming.records()), ["Grace Hopper", "Ada Lovelace"]);
        assert!(engine.select(&records, &Selection::Month(13)).is_err());
    }

    #[test]
    fn test_order_by_upcoming() {
        let records = sample();
        let engine = Engine::default();

        let upcoming = engine.order_by_upcoming(&records, date(2024, 6, 24));

        assert_eq!(
            names(upcoming.records()),
            [
                "Grace Hopper",
                "Ada Lovelace",
                "Edsger Dijkstra",
                "Alan Turing"
            ]
        );
        assert!(upcoming.rejected.is_empty());
    }

    #[test]
    fn test_order_by_upcoming_is_idempotent() {
        let records = sample();
        let engine = Engine::default();
        let today = date(2024, 3, 1);

        assert_eq!(
            engine.order_by_upcoming(&records, today),
            engine.order_by_upcoming(&records, today)
        );
    }

    #[test]
    fn test_order_by_upcoming_is_stable() {
        let records = vec![
            record("Twin B", date(1990, 4, 2)),
            record("Someone", date(1985, 4, 1)),
            record("Twin A", date(1990, 4, 2)),
            record("Cousin", date(2001, 4, 2)),
        ];
        let engine = Engine::default();

        let upcoming = engine.order_by_upcoming(&records, date(2024, 3, 1));

        assert_eq!(
            names(upcoming.records()),
            ["Someone", "Twin B", "Twin A", "Cousin"]
        );
    }

    #[test]
    fn test_order_by_upcoming_puts_today_first() {
        let records = vec![
            record("Tomorrow", date(2000, 3, 16)),
            record("Yesterday", date(2000, 3, 14)),
            record("Today", date(2000, 3, 15)),
        ];
        let engine = Engine::default();

        let upcoming = engine.order_by_upcoming(&records, date(2024, 3, 15));

        assert_eq!(
            names(upcoming.records()),
            ["Today", "Tomorrow", "Yesterday"]
        );
    }

    #[test]
    fn test_order_by_upcoming_reports_invalid_records() {
        let records = vec![
            record("Ada Lovelace", date(1815, 12, 10)),
            Record::new("Unknown", None, None),
            Record::new("", Some(date(2000, 1, 1)), None),
        ];
        let engine = Engine::default();

        let upcoming = engine.order_by_upcoming(&records, date(2024, 1, 1));

        assert_eq!(names(upcoming.records()), ["Ada Lovelace"]);
        assert_eq!(
            upcoming
                .rejected
                .iter()
                .map(|r| r.reason)
                .collect::<Vec<_>>(),
            [InvalidInput::MissingBirthDate, InvalidInput::EmptyName]
        );
    }

    #[test]
    fn test_todays_birthdays() {
        let records = vec![
            record("Before", date(1999, 3, 14)),
            record("Birthday", date(2000, 3, 15)),
            record("After", date(2001, 3, 16)),
        ];
        let engine = Engine::default();

        let todays = engine.todays_birthdays(&records, date(2024, 3, 15));

        assert_eq!(names(todays.records()), ["Birthday"]);
        assert_eq!(todays.scheduled.first().unwrap().view.upcoming_age(), 24);
    }

    #[test]
    fn test_todays_birthdays_leap_day_policy() {
        let records = vec![record("Leapling", date(2000, 2, 29))];
        let today = date(2023, 2, 28);

        assert_eq!(
            Engine::new(LeapDayPolicy::Feb28)
                .todays_birthdays(&records, today)
                .scheduled
                .len(),
            1
        );
        assert!(
            Engine::new(LeapDayPolicy::Mar1)
                .todays_birthdays(&records, today)
                .scheduled
                .is_empty()
        );
    }

    #[test]
    fn test_summarize() {
        let records = vec![
            record("Alan Turing", date(1912, 6, 23)),
            record("Ada Lovelace", date(1815, 12, 10)),
        ];
        let engine = Engine::default();

        let summary = engine.summarize(&records, date(2024, 7, 1));

        assert_eq!(
            summary
                .lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            [
                "Ada Lovelace: 2024-12-10 (turns 209)",
                "Alan Turing: 2025-06-23 (turns 113)"
            ]
        );
    }
}
