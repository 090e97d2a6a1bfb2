//! `periods` CLI — merge, subtract, divide, trim and query lists of time periods.
//!
//! Every subcommand reads a JSON array of `{"start", "end"}` objects (ISO 8601
//! timestamps) and writes the resulting list as pretty-printed JSON.
//!
//! ## Usage
//!
//! ```sh
//! # Union of overlapping periods (stdin → stdout)
//! echo '[{"start":"2024-09-08T09:00:00","end":"2024-09-08T10:30:00"}]' | periods merge
//!
//! # Union with a second file
//! periods merge -i busy.json --with more-busy.json
//!
//! # Free time: open hours minus busy periods, slots of at least 30 minutes
//! periods subtract -i open-hours.json --subtrahends busy.json --min-duration 30
//!
//! # Cut every period into 15-minute slots
//! periods divide -i free.json --length 15 -o slots.json
//!
//! # Leave a 10-minute buffer at the end of every period
//! periods trim -i slots.json --duration 10
//!
//! # Does any single period cover the given span?
//! periods contains -i free.json --start 2024-09-08T09:00:00 --end 2024-09-08T09:30:00
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::debug;
use period_algebra::{Period, PeriodList};
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "periods",
    version,
    about = "Time-period algebra: merge, subtract, divide and trim lists of periods"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Args)]
struct Io {
    /// Input JSON file of periods (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge overlapping and touching periods into a sorted list
    Merge {
        #[command(flatten)]
        io: Io,
        /// Additional JSON file of periods to merge in
        #[arg(long)]
        with: Option<String>,
    },
    /// Subtract a list of periods from every input period
    Subtract {
        #[command(flatten)]
        io: Io,
        /// JSON file of periods to subtract
        #[arg(long)]
        subtrahends: String,
        /// Drop fragments shorter than this many minutes
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        min_duration: i64,
    },
    /// Divide every period into consecutive chunks
    Divide {
        #[command(flatten)]
        io: Io,
        /// Chunk length in minutes
        #[arg(long, allow_negative_numbers = true)]
        length: i64,
    },
    /// Pull the end of every period back
    Trim {
        #[command(flatten)]
        io: Io,
        /// Minutes to remove from the end of each period
        #[arg(long, allow_negative_numbers = true)]
        duration: i64,
    },
    /// Print whether a single input period contains the given span
    Contains {
        /// Input JSON file of periods (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Start of the span (ISO 8601)
        #[arg(long)]
        start: String,
        /// End of the span (ISO 8601)
        #[arg(long)]
        end: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Merge { io, with } => {
            let list = read_periods(io.input.as_deref())?;
            let merged = match with {
                Some(path) => {
                    let additional = read_periods(Some(&path))?;
                    list.merge_multiple_with(&additional)
                }
                None => list.merge_multiple(),
            };
            write_periods(io.output.as_deref(), &merged)?;
        }
        Commands::Subtract {
            io,
            subtrahends,
            min_duration,
        } => {
            let list = read_periods(io.input.as_deref())?;
            let subtrahends = read_periods(Some(&subtrahends))?;
            let remaining = list
                .subtract_multiple_with_minimum(&subtrahends, min_duration)
                .context("Failed to subtract periods")?;
            write_periods(io.output.as_deref(), &remaining)?;
        }
        Commands::Divide { io, length } => {
            let list = read_periods(io.input.as_deref())?;
            let chunks = list
                .divide_all_by_length(length)
                .context("Failed to divide periods")?;
            write_periods(io.output.as_deref(), &chunks)?;
        }
        Commands::Trim { io, duration } => {
            let list = read_periods(io.input.as_deref())?;
            let trimmed = list
                .trim_all_end(duration)
                .context("Failed to trim periods")?;
            write_periods(io.output.as_deref(), &trimmed)?;
        }
        Commands::Contains { input, start, end } => {
            let list = read_periods(input.as_deref())?;
            let query = Period::parse(&start, &end).context("Invalid query period")?;
            println!("{}", list.contains(&query));
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn read_periods(path: Option<&str>) -> Result<PeriodList> {
    let json = read_input(path)?;
    let list: PeriodList = serde_json::from_str(&json).with_context(|| {
        format!(
            "Failed to parse periods from {}",
            path.unwrap_or("stdin")
        )
    })?;
    debug!("read {} period(s) from {}", list.len(), path.unwrap_or("stdin"));
    Ok(list)
}

fn write_periods(path: Option<&str>, list: &PeriodList) -> Result<()> {
    let mut json = serde_json::to_string_pretty(list)?;
    json.push('\n');
    write_output(path, &json)
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
            print!("{}", content);
        }
    }
    Ok(())
}
