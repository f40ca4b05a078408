//! `pitch` CLI — seed, check, and query sports-field booking schedules.
//!
//! ## Usage
//!
//! ```sh
//! # Seed 100 conflict-free bookings around today (random seed)
//! pitch seed
//!
//! # Reproducible schedule anchored on a fixed date, written to a file
//! pitch seed --count 250 --seed 42 --today 2025-06-01 -o bookings.json
//!
//! # Custom demand profile and field list
//! pitch seed --policy policy.json --fields fields.json
//!
//! # Report overlapping bookings (exit code 1 if any)
//! pitch check -i bookings.json
//!
//! # Free hours on a field for one day
//! pitch free --field FLD-1 --date 2025-06-01 -i bookings.json
//! ```

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use pitch_engine::freebusy::{find_first_free_slot, find_free_slots, FreeSlot};
use pitch_engine::model::{Booking, Field};
use pitch_engine::{find_conflicts, synthesize_with_report, SynthesisPolicy, VenueSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pitch",
    version,
    about = "Seed and check sports-field booking schedules"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a conflict-free booking schedule as JSON
    Seed {
        /// Number of bookings to aim for
        #[arg(short, long, default_value_t = 100)]
        count: usize,
        /// Random seed (derived from the clock if omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Anchor date for the rolling window (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Synthesis policy JSON file (defaults to the built-in profile)
        #[arg(long)]
        policy: Option<String>,
        /// Field list JSON file (defaults to the venue's three fields)
        #[arg(long)]
        fields: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Report every pair of overlapping bookings
    Check {
        /// Bookings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List free hours on one field for one day
    Free {
        /// Field id, e.g. FLD-1
        #[arg(long)]
        field: String,
        /// Date to inspect (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Bookings JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Venue settings JSON file (defaults to the built-in opening hours)
        #[arg(long)]
        settings: Option<String>,
        /// Only print the first slot at least this many hours long
        #[arg(long)]
        min_hours: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Seed {
            count,
            seed,
            today,
            policy,
            fields,
            output,
        } => {
            let policy = match policy {
                Some(path) => {
                    let raw = read_input(Some(path.as_str()))?;
                    SynthesisPolicy::from_json(&raw)
                        .with_context(|| format!("Invalid synthesis policy: {}", path))?
                }
                None => SynthesisPolicy::default(),
            };
            let fields: Vec<Field> = match fields {
                Some(path) => serde_json::from_str(&read_input(Some(path.as_str()))?)
                    .with_context(|| format!("Invalid field list: {}", path))?,
                None => Field::reference_set(),
            };
            let now = match today {
                Some(day) => day
                    .and_hms_opt(12, 0, 0)
                    .context("Invalid --today date")?
                    .and_utc(),
                None => Utc::now(),
            };
            let seed = seed.unwrap_or_else(|| Utc::now().timestamp().unsigned_abs());
            info!(seed, count, "seeding schedule");

            let mut rng = StdRng::seed_from_u64(seed);
            let report = synthesize_with_report(count, &fields, &policy, now, &mut rng)
                .context("Failed to synthesize schedule")?;

            let json = serde_json::to_string_pretty(&report.bookings)?;
            write_output(output.as_deref(), &json)?;

            eprintln!(
                "Generated {} of {} bookings in {} attempts (seed {})",
                report.bookings.len(),
                report.target_count,
                report.attempts,
                seed
            );
            eprintln!(
                "Rejected: {} past closing, {} conflicting",
                report.closing_rejections, report.conflict_rejections
            );
        }
        Commands::Check { input } => {
            let bookings = read_bookings(input.as_deref())?;
            let found = find_conflicts(&bookings);

            if found.is_empty() {
                println!("No conflicts among {} bookings", bookings.len());
            } else {
                for c in &found {
                    println!(
                        "{} <-> {} on {} {} ({}h overlap)",
                        c.booking_a.id,
                        c.booking_b.id,
                        c.booking_a.field_id,
                        c.booking_a.date,
                        c.overlap_hours
                    );
                }
                anyhow::bail!(
                    "{} conflicting pair(s) among {} bookings",
                    found.len(),
                    bookings.len()
                );
            }
        }
        Commands::Free {
            field,
            date,
            input,
            settings,
            min_hours,
        } => {
            let venue = match settings {
                Some(path) => VenueSettings::load(Path::new(&path))
                    .with_context(|| format!("Failed to load venue settings: {}", path))?,
                None => VenueSettings::default(),
            };
            let bookings = read_bookings(input.as_deref())?;

            let Some((open, close)) = venue.hours_for(date) else {
                println!("{} is closed on {}", venue.name, date);
                return Ok(());
            };

            let slots: Vec<FreeSlot> = match min_hours {
                Some(min) => find_first_free_slot(&bookings, &field, date, open, close, min)
                    .into_iter()
                    .collect(),
                None => find_free_slots(&bookings, &field, date, open, close),
            };

            if slots.is_empty() {
                println!("No free slots on {} for {}", field, date);
            }
            for slot in &slots {
                println!(
                    "{:02}:00-{:02}:00 ({}h)",
                    slot.start_hour, slot.end_hour, slot.duration_hours
                );
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout stays clean for JSON output.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_bookings(path: Option<&str>) -> Result<Vec<Booking>> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse bookings JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
