//! Command-line front end over `studyplan_core`.
//!
//! # Responsibility
//! - Load configuration and start file logging when configured.
//! - Expose period planning, template preview and database bootstrap.

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use studyplan_core::{
    apply_template, build_period, classify, core_version, init_logging_from_config, open_db,
    CalendarService, CoreConfig, PeriodLayout, SqliteCalendarRepository,
};

#[derive(Parser)]
#[command(name = "studyplan", version, about = "Study planner CLI")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Greet according to the current time of day
    Greet {
        /// Name to greet
        name: Option<String>,
    },
    /// Generate the weeks and days of a period
    PlanPeriod {
        /// Period name, e.g. "Semester 1"
        #[arg(long)]
        name: String,
        /// First Monday of the period (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// Number of weeks to generate
        #[arg(long)]
        weeks: u32,
        /// Number given to the first week
        #[arg(long, default_value_t = 1)]
        first_week: u32,
        /// Academic year the period belongs to
        #[arg(long, default_value_t = 1)]
        year: u32,
        /// Owning user id
        #[arg(long, default_value_t = 1)]
        user: i64,
        /// Persist the period to the configured database
        #[arg(long)]
        save: bool,
    },
    /// Preview a description template for a week
    Template {
        /// Week number substituted for the placeholders
        #[arg(long)]
        week: u32,
        /// Description containing `=`, `<` or `>` placeholders
        text: String,
    },
    /// Create or migrate the configured database
    InitDb,
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CoreConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    init_logging_from_config(&config.logging).context("failed to start logging")?;
    info!(
        "event=cli_start module=cli status=ok version={}",
        core_version()
    );

    match cli.command {
        Commands::Greet { name } => {
            let segment = classify(Local::now().time());
            match name {
                Some(name) => println!("{}, {name}!", segment.greeting()),
                None => println!("{}!", segment.greeting()),
            }
        }
        Commands::PlanPeriod {
            name,
            start,
            weeks,
            first_week,
            year,
            user,
            save,
        } => {
            let layout = if save {
                let conn = open_db(&config.database.path).with_context(|| {
                    format!("failed to open `{}`", config.database.path.display())
                })?;
                let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn)?);
                service.create_period(user, year, &name, weeks, start, first_week)?
            } else {
                build_period(user, year, &name, weeks, start, first_week)?
            };
            print_layout(&layout);
        }
        Commands::Template { week, text } => {
            println!("{}", apply_template(week, &text));
        }
        Commands::InitDb => {
            let path = &config.database.path;
            if path.as_os_str().is_empty() {
                bail!("database path is empty");
            }
            open_db(path).with_context(|| format!("failed to open `{}`", path.display()))?;
            println!("database ready path={}", path.display());
        }
    }
    Ok(())
}

fn print_layout(layout: &PeriodLayout) {
    println!(
        "period id={} name={} year={} weeks={}",
        layout.period.id,
        layout.period.name,
        layout.period.associated_year,
        layout.weeks.len()
    );
    for week in &layout.weeks {
        println!(
            "  week {} id={} {}..{}",
            week.week.week_number,
            week.week.id,
            week.week.start_date,
            week.week.end_date()
        );
    }
}
