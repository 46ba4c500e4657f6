//! Ingest of gridded monthly precipitation ("grim") files.
//!
//! A grim file has a bracketed metadata header followed by one block per
//! grid cell: a `Grid-ref` line, then a line of twelve monthly values per
//! year. This crate decodes such files into `PrecipitationRecord`s, stores
//! them idempotently and renders them as a sortable table.

pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod store;
pub mod summary;

pub use error::{Error, Result};
