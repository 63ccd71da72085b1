use std::process::ExitCode;

use birthday_lib::{Error, LeapDayPolicy, RecordId, Repository};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod edit;
mod report;

#[derive(Parser, Debug)]
#[command(name = "birthdays")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Compute against this date instead of the current one (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Override where February 29 birthdays fall in common years
    #[arg(long, global = true, value_enum)]
    leap_day: Option<LeapDayPolicy>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Add a birthday
    Add(edit::AddArgs),
    /// Change a stored birthday
    Edit(edit::EditArgs),
    /// Remove a stored birthday
    Remove { id: u64 },
    /// Show birthdays ordered by how soon they come up
    List(report::Filter),
    /// Print the upcoming birthdays report
    Upcoming(report::Filter),
    /// Show whose birthday it is today
    Today,
    /// Show where configuration and data are kept
    Config,
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            exit_code(&err).into()
        }
    }
}

fn run(cli: &Cli) -> birthday_lib::Result<()> {
    let repo = Repository::new()?;

    if let Some(leap_day) = cli.leap_day {
        repo.cfg().write().set_leap_day(leap_day);
    }

    // Captured once so everything derived during this invocation agrees on the date
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    debug!("Reference date is {today}");

    match &cli.command {
        Command::Add(args) => edit::add(&repo, args),
        Command::Edit(args) => edit::edit(&repo, args),
        Command::Remove { id } => edit::remove(&repo, RecordId::from(*id)),
        Command::List(filter) => report::list(&repo, filter, today),
        Command::Upcoming(filter) => report::upcoming(&repo, filter, today),
        Command::Today => report::today(&repo, today),
        Command::Config => report::config(&repo),
    }
}

fn exit_code(err: &Error) -> sysexits::ExitCode {
    match err {
        Error::InvalidInput(_) | Error::UnsupportedModelVersion { .. } => {
            sysexits::ExitCode::DataErr
        }
        Error::NotFound(_) => sysexits::ExitCode::NoInput,
        Error::Storage(_) | Error::Io(_) => sysexits::ExitCode::IoErr,
        Error::ConfigRead(_) | Error::ConfigWrite(_) => sysexits::ExitCode::Config,
    }
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from([
            "birthdays",
            "list",
            "--month",
            "3",
            "--today",
            "2024-03-15",
            "--leap-day",
            "mar-1",
        ]);

        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(cli.leap_day, Some(LeapDayPolicy::Mar1));
        assert!(matches!(cli.command, Command::List(_)));
    }
}
