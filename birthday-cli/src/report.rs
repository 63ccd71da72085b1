use birthday_lib::{
    Record, Rejected, Repository, Result, Selection, Upcoming, repository::config::CoreConfig,
};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;
use tracing::trace;

/// Narrow the birthdays shown. A name takes precedence over a month.
#[derive(Args, Debug, Clone)]
pub struct Filter {
    /// Only birthdays whose name contains this text (case-insensitive)
    #[arg(short, long)]
    name: Option<String>,
    /// Only birthdays in this month (1-12)
    #[arg(short, long)]
    month: Option<u32>,
}

impl Filter {
    fn selection(&self) -> Selection {
        Selection::from_inputs(self.name.as_deref(), self.month)
    }
}

/// The birthdays table, followed by today's birthdays.
pub fn list(repo: &Repository, filter: &Filter, today: NaiveDate) -> Result<()> {
    let engine = repo.engine();
    let records = repo.list_all()?;

    let selected = engine.select(&records, &filter.selection())?;
    let upcoming = engine.order_by_upcoming(selected, today);
    trace!("Listing {} birthdays", upcoming.scheduled.len());

    if upcoming.scheduled.is_empty() {
        println!("No birthdays found");
    } else {
        print_table(&upcoming);
    }

    print_rejected(&upcoming.rejected);

    // Always about everyone, regardless of the filter
    let todays = engine.todays_birthdays(&records, today);
    if !todays.scheduled.is_empty() {
        println!();
        print_todays(&todays);
    }

    Ok(())
}

pub fn upcoming(repo: &Repository, filter: &Filter, today: NaiveDate) -> Result<()> {
    let engine = repo.engine();
    let records = repo.list_all()?;

    let selected = engine.select(&records, &filter.selection())?;
    let summary = engine.summarize(selected, today);

    if summary.lines.is_empty() {
        println!("No birthdays found");
    }

    for line in &summary.lines {
        println!("{line}");
    }

    print_rejected(&summary.rejected);

    Ok(())
}

pub fn today(repo: &Repository, today: NaiveDate) -> Result<()> {
    let records = repo.list_all()?;
    let todays = repo.engine().todays_birthdays(&records, today);

    if todays.scheduled.is_empty() {
        println!("No birthdays today");
    } else {
        print_todays(&todays);
    }

    print_rejected(&todays.rejected);

    Ok(())
}

pub fn config(repo: &Repository) -> Result<()> {
    let cfg = repo.cfg();
    let cfg = cfg.read();

    println!("{:<10} {}", "config", CoreConfig::path()?.display());
    println!("{:<10} {}", "database", cfg.database_path()?.display());
    println!("{:<10} {}", "leap day", cfg.leap_day());

    Ok(())
}

fn print_table(upcoming: &Upcoming) {
    println!(
        "{}",
        format!(
            "{:<5} {:<24} {:<10}  {:<10}  {:>4}  {}",
            "ID", "Name", "Born", "Next", "Age", "Notes"
        )
        .bold()
    );

    for entry in &upcoming.scheduled {
        let born = entry
            .record
            .birth_date()
            .map(|d| d.to_string())
            .unwrap_or_default();

        let row = format!(
            "{:<5} {:<24} {:<10}  {:<10}  {:>4}  {}",
            id_label(entry.record),
            entry.record.name(),
            born,
            entry.view.next_occurrence(),
            entry.view.upcoming_age(),
            entry.record.notes()
        );

        if entry.view.is_today() {
            println!("{}", row.green().bold());
        } else {
            println!("{row}");
        }
    }
}

fn print_todays(todays: &Upcoming) {
    for entry in &todays.scheduled {
        println!(
            "{} has a birthday today! (turns {})",
            entry.record.name().green().bold(),
            entry.view.upcoming_age()
        );
    }
}

fn print_rejected(rejected: &[Rejected]) {
    for r in rejected {
        eprintln!(
            "{} {} {}: {}",
            "skipped".yellow(),
            id_label(r.record),
            r.record.name(),
            r.reason
        );
    }
}

fn id_label(record: &Record) -> String {
    record
        .id()
        .map(|id| format!("#{id}"))
        .unwrap_or_else(|| "-".into())
}
