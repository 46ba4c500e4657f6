/// Structured logging for the precipitation ingest
///
/// Every message is tagged with the pipeline stage that produced it and,
/// where it applies, the grid cell (`x,y`) it concerns. Output goes to the
/// console and optionally to an append-only log file, through `tracing`.

use std::fmt;
use std::fs::OpenOptions;
use std::sync::Mutex;

use serde::Deserialize;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{Error, Result};
use crate::model::ProblemRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Source,
    Header,
    Decode,
    Store,
    Report,
    System,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Source => write!(f, "SRC"),
            Stage::Header => write!(f, "HDR"),
            Stage::Decode => write!(f, "GRID"),
            Stage::Store => write!(f, "DB"),
            Stage::Report => write!(f, "RPT"),
            Stage::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Logger settings, read from the `[logging]` section of the config file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Minimum log level to display; `RUST_LOG` overrides it
    pub level: LogLevel,
    /// Optional file path for logging
    pub file: Option<String>,
    /// Whether to include timestamps in console output
    pub timestamps: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            timestamps: false,
        }
    }
}

/// Install the global subscriber. Console output goes to stderr so the
/// report on stdout stays clean.
pub fn init_logger(settings: &LogSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.as_filter()));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let console = if settings.timestamps {
        console
            .with_timer(ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .boxed()
    } else {
        console.without_time().boxed()
    };

    let file_layer = match &settings.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_timer(ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Log a general informational message
pub fn info(stage: Stage, cell: Option<&str>, message: &str) {
    tracing::info!(stage = %stage, cell = cell.unwrap_or("-"), "{}", message);
}

/// Log a warning message
pub fn warn(stage: Stage, cell: Option<&str>, message: &str) {
    tracing::warn!(stage = %stage, cell = cell.unwrap_or("-"), "{}", message);
}

/// Log an error message
pub fn error(stage: Stage, cell: Option<&str>, message: &str) {
    tracing::error!(stage = %stage, cell = cell.unwrap_or("-"), "{}", message);
}

/// Log a debug message
pub fn debug(stage: Stage, cell: Option<&str>, message: &str) {
    tracing::debug!(stage = %stage, cell = cell.unwrap_or("-"), "{}", message);
}

// ---------------------------------------------------------------------------
// Summary Logging
// ---------------------------------------------------------------------------

/// Log one warning per malformed data line so the source can be inspected.
pub fn log_problem_records(problems: &[ProblemRecord]) {
    for problem in problems {
        let cell = format!("{},{}", problem.x, problem.y);
        warn(
            Stage::Decode,
            Some(&cell),
            &format!("year {} skipped, raw data {:?}", problem.year, problem.tokens),
        );
    }
}

/// Log the outcome of one insert into the store.
pub fn log_store_summary(total: usize, inserted: usize, skipped: usize) {
    let message = format!(
        "Store complete: {}/{} inserted, {} already present",
        inserted, total, skipped
    );

    if total == 0 {
        warn(Stage::Store, None, "no records to store");
    } else if inserted == 0 {
        info(Stage::Store, None, &format!("{} (nothing new)", message));
    } else {
        info(Stage::Store, None, &message);
    }
}
