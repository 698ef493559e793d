//! Command-line parsing for the brand trend analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetching/aggregation code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::datalab::DEFAULT_TIMEOUT_SECS;
use crate::domain::{TimeUnit, parse_date};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trends", version, about = "Food-brand search trends (NAVER DataLab)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch trends, print rankings and charts, and optionally export.
    Analyze(AnalyzeArgs),
    /// List categories and their brand keyword groups.
    Categories(CatalogArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same pipeline as `trends analyze`, but renders results
    /// in a terminal UI using Ratatui.
    Tui(QueryArgs),
}

/// Options shared by every command that runs a query.
#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    /// First day of the range (YYYY-MM-DD). Defaults to 7 days ago.
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD). Defaults to yesterday.
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Granularity of the returned series.
    #[arg(short = 'u', long, value_enum, default_value_t = TimeUnit::Day)]
    pub unit: TimeUnit,

    /// Category to analyze (repeatable). Defaults to the first catalog category.
    #[arg(short = 'c', long = "category", value_name = "NAME")]
    pub categories: Vec<String>,

    /// Catalog JSON replacing the built-in categories.
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,

    /// API host override (also read from NAVER_DATALAB_URL).
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Options for `trends analyze`.
#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Export raw points (brand, period, ratio) to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export rankings, failures, and raw points to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,
}

/// Options for `trends categories`.
#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// Catalog JSON replacing the built-in categories.
    #[arg(long, value_name = "JSON")]
    pub catalog: Option<PathBuf>,
}
