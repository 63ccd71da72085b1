use birthday_lib::{Record, RecordId, Repository, Result};
use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    name: String,
    /// Birth date (YYYY-MM-DD)
    born: NaiveDate,
    #[arg(short, long)]
    notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    id: u64,
    #[arg(long)]
    name: Option<String>,
    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    born: Option<NaiveDate>,
    #[arg(short, long)]
    notes: Option<String>,
}

pub fn add(repo: &Repository, args: &AddArgs) -> Result<()> {
    let record = Record::new(&args.name, Some(args.born), args.notes.as_deref());
    let id = repo.create(&record)?;

    println!("Added {} ({})", record.name().bold(), format!("#{id}").dimmed());

    Ok(())
}

/// Apply only the fields that were given on the command line
pub fn edit(repo: &Repository, args: &EditArgs) -> Result<()> {
    let id = RecordId::from(args.id);
    let mut record = repo.get(id)?;

    if let Some(name) = &args.name {
        record = record.with_name(name);
    }
    if let Some(born) = args.born {
        record = record.with_birth_date(born);
    }
    if let Some(notes) = &args.notes {
        record = record.with_notes(notes);
    }

    repo.update(id, &record)?;

    println!("Updated {} ({})", record.name().bold(), format!("#{id}").dimmed());

    Ok(())
}

pub fn remove(repo: &Repository, id: RecordId) -> Result<()> {
    let record = repo.get(id)?;
    repo.delete(id)?;

    println!("Removed {} ({})", record.name().bold(), format!("#{id}").dimmed());

    Ok(())
}
