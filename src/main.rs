mod config;
mod error;
mod logging;
mod models;
mod query;
mod stats;
mod storage;
mod store;
mod tui;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use config::Config;
use error::StoreError;
use models::{ApplicationFields, JobType, Status};
use query::StatusFilter;
use std::path::PathBuf;
use storage::{SqliteStorage, Storage};
use store::RecordStore;

#[derive(Parser)]
#[command(name = "orbit")]
#[command(about = "Track job applications and see how the search is going")]
struct Cli {
    /// Path to the database file
    #[arg(long, global = true, env = "ORBIT_DB")]
    db: Option<PathBuf>,

    /// Days shown in the application trend (1-366)
    #[arg(long, global = true, env = "ORBIT_WINDOW_DAYS", value_parser = window_days_parser())]
    window_days: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the storage file
    Init,

    /// Record a new application
    Add {
        company: String,

        position: String,

        /// Application date, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        /// applied, interview, offer, rejected
        #[arg(short, long, default_value = "applied")]
        status: Status,

        /// full-time, part-time, contract, internship
        #[arg(short = 't', long, default_value = "full-time")]
        job_type: JobType,

        #[arg(short, long)]
        remote: bool,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List applications
    List {
        /// all, applied, interview, offer, rejected
        #[arg(short, long, default_value = "all")]
        status: StatusFilter,

        /// Case-insensitive match on company or position
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Show application details
    Show {
        id: i64,
    },

    /// Change an application; omitted fields keep their value
    Edit {
        id: i64,

        #[arg(long)]
        company: Option<String>,

        #[arg(long)]
        position: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(long)]
        salary: Option<String>,

        #[arg(short, long)]
        status: Option<Status>,

        #[arg(short = 't', long)]
        job_type: Option<JobType>,

        /// true or false
        #[arg(short, long)]
        remote: Option<bool>,

        #[arg(short, long)]
        date: Option<NaiveDate>,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete an application
    Delete {
        id: i64,
    },

    /// Show counts, rates and the recent trend
    Stats {
        /// Number of days in the trend, 1-366 (defaults to --window-days)
        #[arg(short, long, value_parser = window_days_parser())]
        days: Option<u32>,

        /// Last day of the trend, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive dashboard
    Browse,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.db, cli.window_days);

    if let Commands::Browse = cli.command {
        let storage = SqliteStorage::open(&config.db_path)?;
        logging::init(Some(&config.log_path()));
        let mut store = RecordStore::load(storage, &config.storage_key);
        return tui::run_browse(&mut store, &config);
    }

    logging::init(None);
    let storage = SqliteStorage::open(&config.db_path)?;

    if let Commands::Init = cli.command {
        let path = storage.path().unwrap_or(&config.db_path);
        println!("Storage initialized at {}", path.display());
        return Ok(());
    }

    let mut store = RecordStore::load(storage, &config.storage_key);

    match cli.command {
        Commands::Init | Commands::Browse => {}

        Commands::Add {
            company,
            position,
            date,
            location,
            salary,
            status,
            job_type,
            remote,
            notes,
        } => {
            let fields = ApplicationFields {
                company,
                position,
                location: location.unwrap_or_default(),
                salary: salary.unwrap_or_default(),
                status,
                job_type,
                remote,
                application_date: Some(date.unwrap_or_else(|| Local::now().date_naive())),
                notes: notes.unwrap_or_default(),
            };
            let id = store.create(fields)?;
            println!("Added application #{}", id);
            warn_if_unsaved(&store);
        }

        Commands::List { status, search } => {
            let records = query::filter(store.list(), search.as_deref().unwrap_or(""), status);
            if records.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<14} {:<10} {:<22} {:<26} {:<11} {:<10}",
                    "ID", "STATUS", "COMPANY", "POSITION", "DATE", "TYPE"
                );
                println!("{}", "-".repeat(98));
                for app in records {
                    println!(
                        "{:<14} {:<10} {:<22} {:<26} {:<11} {:<10}",
                        app.id,
                        app.status,
                        truncate(&app.company, 20),
                        truncate(&app.position, 24),
                        app.application_date.to_string(),
                        app.job_type
                    );
                }
            }
        }

        Commands::Show { id } => match store.get(id) {
            Some(app) => {
                println!("Application #{}", app.id);
                println!("Company: {}", app.company);
                println!("Position: {}", app.position);
                println!("Status: {}", app.status);
                println!("Type: {}{}", app.job_type, if app.remote { " (remote)" } else { "" });
                println!(
                    "Location: {}",
                    if app.location.is_empty() { "Not specified" } else { app.location.as_str() }
                );
                if !app.salary.is_empty() {
                    println!("Salary: {}", app.salary);
                }
                println!("Applied: {}", app.application_date);
                println!("Created: {}", app.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"));
                if !app.notes.is_empty() {
                    println!("\n--- Notes ---\n{}", textwrap::fill(&app.notes, 70));
                }
            }
            None => {
                println!("Application #{} not found.", id);
            }
        },

        Commands::Edit {
            id,
            company,
            position,
            location,
            salary,
            status,
            job_type,
            remote,
            date,
            notes,
        } => {
            let Some(existing) = store.get(id) else {
                println!("Application #{} not found.", id);
                return Ok(());
            };
            let mut fields = ApplicationFields::from(existing);
            if let Some(company) = company {
                fields.company = company;
            }
            if let Some(position) = position {
                fields.position = position;
            }
            if let Some(location) = location {
                fields.location = location;
            }
            if let Some(salary) = salary {
                fields.salary = salary;
            }
            if let Some(status) = status {
                fields.status = status;
            }
            if let Some(job_type) = job_type {
                fields.job_type = job_type;
            }
            if let Some(remote) = remote {
                fields.remote = remote;
            }
            if date.is_some() {
                fields.application_date = date;
            }
            if let Some(notes) = notes {
                fields.notes = notes;
            }
            store.update(id, fields)?;
            println!("Updated application #{}", id);
            warn_if_unsaved(&store);
        }

        Commands::Delete { id } => match store.delete(id) {
            Ok(()) => {
                println!("Deleted application #{}", id);
                warn_if_unsaved(&store);
            }
            Err(StoreError::NotFound(_)) => {
                println!("Application #{} not found.", id);
            }
            Err(e) => return Err(e.into()),
        },

        Commands::Stats { days, today, json } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let window = days.unwrap_or(config.window_days);
            let summary = stats::summarize(store.list(), today, window);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            let counts = summary.counts;
            println!("Total applications: {}", counts.total);
            for status in Status::ALL {
                println!("  {:<10} {}", status.label(), counts.get(status));
            }

            println!("\nSuccess rate:");
            println!("  Offer rate:     {:>3}%", summary.rates.offer);
            println!("  Interview rate: {:>3}%", summary.rates.interview);
            println!("  Rejection rate: {:>3}%", summary.rates.rejection);

            println!("\nLast {} days:", window);
            for bucket in &summary.daily {
                println!("  {:<7} {:>3} {}", bucket.label, bucket.count, "#".repeat(bucket.count));
            }

            if !summary.distribution.is_empty() {
                println!("\nBy status:");
                for slice in &summary.distribution {
                    let share = slice.count as f64 / counts.total as f64 * 100.0;
                    println!("  {:<10} {:>3} ({:.0}%)", slice.status.label(), slice.count, share);
                }
            }
        }
    }

    Ok(())
}

fn window_days_parser() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=i64::from(stats::MAX_WINDOW_DAYS))
}

fn warn_if_unsaved<S: Storage>(store: &RecordStore<S>) {
    if let Some(err) = store.last_save_error() {
        eprintln!("Warning: change kept in memory but not saved: {}", err);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
