//! precip_grid - decode a grim precipitation file, store it, print it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use precip_grid::cli::{classify_args, prompt};
use precip_grid::config::Config;
use precip_grid::ingest::run_pipeline;
use precip_grid::logging::{self, init_logger, Stage};
use precip_grid::report::{build_table, SortKey};
use precip_grid::store::{MemoryStore, PgStore, PrecipitationSink};
use precip_grid::summary::RunSummary;

/// Command-line arguments for precip_grid
#[derive(Parser, Debug)]
#[command(name = "precip_grid")]
#[command(about = "Decode a gridded precipitation file into a deduplicated store and a table")]
#[command(version)]
struct Args {
    /// Input file and/or sort column (xref, yref, date, value, none), in any order
    args: Vec<String>,

    /// Config file (TOML)
    #[arg(short, long, env = "PRECIP_GRID_CONFIG")]
    config: Option<PathBuf>,

    /// Cells decoded per pass; 0 lifts the cap
    #[arg(long)]
    max_cells: Option<usize>,

    /// Keep decoding past the cell cap in successive passes
    #[arg(long)]
    all_passes: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    if let Some(max_cells) = args.max_cells {
        config.decode.max_cells = max_cells;
    }
    if args.all_passes {
        config.decode.all_passes = true;
    }

    init_logger(&config.logging)?;

    let invocation = classify_args(&args.args);
    let target = match invocation.target {
        Some(target) => target,
        None => prompt("Enter the file name: ")?,
    };
    let target = PathBuf::from(target);

    let mut sink: Box<dyn PrecipitationSink> = match config.database_url() {
        Some(url) => Box::new(PgStore::connect(&url).context("Failed to connect to database")?),
        None => {
            logging::warn(Stage::Store, None, "no database configured, records kept in memory for this run");
            Box::new(MemoryStore::new())
        }
    };

    let outcome = run_pipeline(
        &target,
        &config.grid_format(),
        config.decode.settings(),
        sink.as_mut(),
    )?;
    let parsed = &outcome.parsed;

    if !parsed.problems.is_empty() {
        println!("Found problems with some data");
        for problem in &parsed.problems {
            println!("{}", problem);
        }
    }

    if let Some(path) = &args.summary_json {
        RunSummary::new(&target, &outcome, Utc::now())
            .write_json(path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        logging::info(Stage::Report, None, &format!("summary written to {}", path.display()));
    }

    println!("Data has been parsed with {} rows", parsed.records.len());
    println!("Header Data");
    println!("{}", parsed.metadata);

    let sort_by = match invocation.sort_by.or_else(|| config.report.sort_by.clone()) {
        Some(sort_by) => sort_by,
        None => prompt("Sort by (Xref, Yref, Date, Value, none): ")?,
    };

    match sort_by.parse::<SortKey>() {
        Ok(key) => println!("{}", build_table(&parsed.records, key)),
        Err(e) => println!("{}", e),
    }

    Ok(())
}
