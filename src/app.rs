//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the catalog and API credentials
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports

use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::catalog::KeywordCatalog;
use crate::cli::{AnalyzeArgs, CatalogArgs, Command, QueryArgs};
use crate::data::{Credentials, DataLabClient};
use crate::domain::{AnalysisConfig, default_date_range};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `trends` binary.
pub fn run() -> Result<(), AppError> {
    // We want `trends` and `trends -c pizza` to behave like `trends tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => {
            init_logging();
            handle_analyze(args)
        }
        Command::Categories(args) => handle_categories(args),
        // The alternate screen owns the terminal; the status line replaces logs.
        Command::Tui(args) => handle_tui(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("brand_trends=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let catalog = load_catalog(&args.query)?;
    let config = analysis_config_from_args(&args, &catalog, Local::now().date_naive());
    let client = build_client(&args.query)?;

    let run = pipeline::run_analysis(&config, &client, &catalog)?;

    println!("{}", crate::report::format_run_summary(&run, &config));

    if config.plot {
        if let Some(chart) = crate::report::trend_chart(&run.table) {
            println!(
                "{}",
                crate::plot::render_trend_plot(&chart, config.plot_width, config.plot_height)
            );
        }
    }

    println!("{}", crate::report::format_mean_ranking(&run.rankings.mean));
    println!("{}", crate::report::format_share(&run.rankings.share));
    if config.plot && !run.rankings.share.is_empty() {
        let rows: Vec<(String, f64)> = run
            .rankings
            .share
            .iter()
            .map(|s| (s.brand.clone(), s.share * 100.0))
            .collect();
        println!(
            "{}",
            crate::plot::render_bars("Share (%):", &rows, bar_width(config.plot_width), |v| format!("{v:.1}%"))
        );
    }

    println!("{}", crate::report::format_growth(&run.rankings.growth, run.range.unit));
    if config.plot && !run.rankings.growth.is_empty() {
        let rows: Vec<(String, f64)> = run
            .rankings
            .growth
            .iter()
            .map(|g| (g.brand.clone(), g.growth_percent))
            .collect();
        println!(
            "{}",
            crate::plot::render_bars("Growth (%):", &rows, bar_width(config.plot_width), |v| format!("{v:.1}%"))
        );
    }

    println!("{}", crate::report::format_series_table(&run.table));

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_series_csv(path, &run.table)?;
        info!(path = %path.display(), "wrote series CSV");
    }
    if let Some(path) = &config.export_json {
        crate::io::export::write_report_json(path, &run, &config)?;
        info!(path = %path.display(), "wrote report JSON");
    }

    Ok(())
}

fn handle_categories(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = match &args.catalog {
        Some(path) => KeywordCatalog::from_json_file(path)?,
        None => KeywordCatalog::default(),
    };
    print!("{}", crate::report::format_categories(&catalog));
    Ok(())
}

fn handle_tui(args: QueryArgs) -> Result<(), AppError> {
    let catalog = load_catalog(&args)?;
    let client = build_client(&args)?;
    let config = query_config(&args, &catalog, Local::now().date_naive());
    crate::tui::run(config, client, catalog)
}

pub fn load_catalog(args: &QueryArgs) -> Result<KeywordCatalog, AppError> {
    match &args.catalog {
        Some(path) => KeywordCatalog::from_json_file(path),
        None => Ok(KeywordCatalog::default()),
    }
}

/// Credentials always come from the environment; the host may come from flags.
pub fn build_client(args: &QueryArgs) -> Result<DataLabClient, AppError> {
    let timeout = Duration::from_secs(args.timeout_secs.max(1));
    match &args.base_url {
        Some(url) => DataLabClient::new(Credentials::from_env()?, url.clone(), timeout),
        None => DataLabClient::from_env(timeout),
    }
}

pub fn analysis_config_from_args(args: &AnalyzeArgs, catalog: &KeywordCatalog, today: NaiveDate) -> AnalysisConfig {
    AnalysisConfig {
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export_csv.clone(),
        export_json: args.export_json.clone(),
        ..query_config(&args.query, catalog, today)
    }
}

/// Query settings with defaults applied (last week, first category).
pub fn query_config(args: &QueryArgs, catalog: &KeywordCatalog, today: NaiveDate) -> AnalysisConfig {
    let (default_start, default_end) = default_date_range(today);
    let categories = if args.categories.is_empty() {
        catalog
            .list_categories()
            .first()
            .map(|c| vec![c.to_string()])
            .unwrap_or_default()
    } else {
        args.categories.clone()
    };

    AnalysisConfig {
        start_date: args.start.unwrap_or(default_start),
        end_date: args.end.unwrap_or(default_end),
        time_unit: args.unit,
        categories,
        plot: false,
        plot_width: 100,
        plot_height: 20,
        export_csv: None,
        export_json: None,
    }
}

fn bar_width(plot_width: usize) -> usize {
    plot_width.saturating_sub(40).clamp(10, 60)
}

/// Rewrite argv so `trends` defaults to `trends tui`.
///
/// Rules:
/// - `trends`                         -> `trends tui`
/// - `trends -c pizza ...`            -> `trends tui -c pizza ...`
/// - `trends --help/--version/-h`     -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "categories" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
