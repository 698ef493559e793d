//! Export a finished analysis to CSV (raw points) or JSON (everything).
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::Rankings;
use crate::app::pipeline::AnalysisOutput;
use crate::data::ChunkFailure;
use crate::domain::{AnalysisConfig, SeriesPoint, SeriesTable, TimeUnit};
use crate::error::AppError;

/// Write every fetched point, grouped by brand and sorted by period.
pub fn write_series_csv(path: &Path, table: &SeriesTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut file = BufWriter::new(file);

    writeln!(file, "brand,period,ratio")
        .map_err(|e| AppError::runtime(format!("Failed to write export CSV header: {e}")))?;

    for (brand, series) in table.grouped() {
        for (period, ratio) in series {
            writeln!(file, "{},{},{:.5}", csv_field(brand), period, ratio)
                .map_err(|e| AppError::runtime(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    file.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct ReportFile<'a> {
    tool: &'static str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    time_unit: TimeUnit,
    categories: &'a [String],
    chunks: usize,
    rankings: &'a Rankings,
    failures: &'a [ChunkFailure],
    series: &'a [SeriesPoint],
}

/// Write the rankings, failures, and raw points as pretty JSON.
pub fn write_report_json(path: &Path, run: &AnalysisOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create report JSON '{}': {e}", path.display())))?;

    let report = ReportFile {
        tool: "trends",
        start_date: run.range.start,
        end_date: run.range.end,
        time_unit: run.range.unit,
        categories: &config.categories,
        chunks: run.chunks,
        rankings: &run.rankings,
        failures: &run.failures,
        series: run.table.points(),
    };

    let mut file = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut file, &report)
        .map_err(|e| AppError::runtime(format!("Failed to write report JSON: {e}")))?;
    file.flush()
        .map_err(|e| AppError::runtime(format!("Failed to flush report JSON: {e}")))?;
    Ok(())
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_field_quotes_when_needed() {
        assert_eq!(csv_field("BBQ"), "BBQ");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn writes_grouped_sorted_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();

        let mut table = SeriesTable::new();
        table.extend([
            SeriesPoint { brand: "B".to_string(), period: d(2), ratio: 1.0 },
            SeriesPoint { brand: "A".to_string(), period: d(2), ratio: 2.0 },
            SeriesPoint { brand: "B".to_string(), period: d(1), ratio: 3.5 },
        ]);
        write_series_csv(&path, &table).unwrap();

        let txt = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            txt,
            "brand,period,ratio\nB,2025-01-01,3.50000\nB,2025-01-02,1.00000\nA,2025-01-02,2.00000\n"
        );
    }

    fn finished_run() -> (AnalysisOutput, AnalysisConfig) {
        use crate::app::pipeline::analyze_fetch;
        use crate::data::FetchOutcome;
        use crate::domain::DateRange;

        let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
        let mut table = SeriesTable::new();
        table.extend([
            SeriesPoint { brand: "A".to_string(), period: d(1), ratio: 10.0 },
            SeriesPoint { brand: "A".to_string(), period: d(2), ratio: 20.0 },
        ]);
        let range = DateRange { start: d(1), end: d(2), unit: TimeUnit::Day };
        let fetch = FetchOutcome { table, failures: Vec::new(), chunks: 1 };
        let run = analyze_fetch(range, Vec::new(), fetch).unwrap();
        let config = AnalysisConfig {
            start_date: d(1),
            end_date: d(2),
            time_unit: TimeUnit::Day,
            categories: vec!["pizza".to_string()],
            plot: false,
            plot_width: 100,
            plot_height: 20,
            export_csv: None,
            export_json: None,
        };
        (run, config)
    }

    #[test]
    fn report_json_is_complete_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let (run, config) = finished_run();
        write_report_json(&path, &run, &config).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["tool"], "trends");
        assert_eq!(value["time_unit"], "date");
        assert_eq!(value["series"].as_array().unwrap().len(), 2);
        assert_eq!(value["rankings"]["mean"][0]["brand"], "A");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn write_errors_surface_for_both_exports() {
        let (run, config) = finished_run();
        let full = Path::new("/dev/full");
        assert!(write_series_csv(full, &run.table).is_err());

        let err = write_report_json(full, &run, &config).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_RUNTIME);
    }
}
