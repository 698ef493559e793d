//! Shared analysis pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! catalog lookup -> chunked fetch -> no-data check -> rankings
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use tracing::info;

use crate::analysis::{Rankings, aggregate};
use crate::catalog::KeywordCatalog;
use crate::data::{ChunkFailure, DataLabClient, FetchOutcome};
use crate::domain::{AnalysisConfig, BrandGroup, DateRange, SeriesTable};
use crate::error::AppError;

/// All computed outputs of a single analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub range: DateRange,
    pub groups: Vec<BrandGroup>,
    pub table: SeriesTable,
    pub rankings: Rankings,
    /// Chunks that were skipped; the rankings cover the rest.
    pub failures: Vec<ChunkFailure>,
    pub chunks: usize,
}

/// Execute the full pipeline: resolve groups, fetch, aggregate.
pub fn run_analysis(
    config: &AnalysisConfig,
    client: &DataLabClient,
    catalog: &KeywordCatalog,
) -> Result<AnalysisOutput, AppError> {
    let range = config.range();
    range.validate()?;
    let groups = catalog.groups_for_all(&config.categories)?;

    info!(
        start = %range.start,
        end = %range.end,
        unit = range.unit.display_name(),
        groups = groups.len(),
        "starting analysis"
    );

    let fetch = client.fetch_table(&range, &groups)?;
    analyze_fetch(range, groups, fetch)
}

/// Aggregate an already-fetched sweep.
///
/// An empty table halts the run with the "no data" error, whatever the reason.
pub fn analyze_fetch(
    range: DateRange,
    groups: Vec<BrandGroup>,
    fetch: FetchOutcome,
) -> Result<AnalysisOutput, AppError> {
    let FetchOutcome { table, failures, chunks } = fetch;

    if table.is_empty() {
        let detail = match failures.first() {
            Some(first) => format!(
                " {} of {chunks} request(s) failed (first: chunk {}: {}).",
                failures.len(),
                first.index + 1,
                first.error
            ),
            None => String::new(),
        };
        return Err(AppError::no_data(format!(
            "No data returned.{detail} Check the dates or API settings."
        )));
    }

    let rankings = aggregate(&table);
    Ok(AnalysisOutput {
        range,
        groups,
        table,
        rankings,
        failures,
        chunks,
    })
}
