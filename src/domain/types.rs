//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - sent to the DataLab API (`BrandGroup`, `TimeUnit`)
//! - used in-memory during aggregation
//! - exported to JSON/CSV

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Granularity of the returned time series points.
///
/// The API spells the daily unit `date`; we accept `day` on the command line and
/// keep `date` as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum TimeUnit {
    #[serde(rename = "date")]
    #[value(name = "day", alias = "date")]
    Day,
    #[serde(rename = "week")]
    #[value(name = "week")]
    Week,
    #[serde(rename = "month")]
    #[value(name = "month")]
    Month,
}

impl TimeUnit {
    /// Value of the `timeUnit` field in the request body.
    pub fn api_value(self) -> &'static str {
        match self {
            TimeUnit::Day => "date",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
        }
    }

    /// Human label for the trailing growth window ("4 weeks", ...).
    pub fn window_label(self, periods: usize) -> String {
        let noun = match self {
            TimeUnit::Day => "days",
            TimeUnit::Week => "weeks",
            TimeUnit::Month => "months",
        };
        format!("{periods} {noun}")
    }

    pub fn next(self) -> Self {
        match self {
            TimeUnit::Day => TimeUnit::Week,
            TimeUnit::Week => TimeUnit::Month,
            TimeUnit::Month => TimeUnit::Day,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            TimeUnit::Day => TimeUnit::Month,
            TimeUnit::Week => TimeUnit::Day,
            TimeUnit::Month => TimeUnit::Week,
        }
    }
}

/// A brand and its keyword synonyms, treated as one search entity by the API.
///
/// The field names follow the DataLab `keywordGroups` schema so the same type can
/// be used for the request body and for catalog files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandGroup {
    #[serde(rename = "groupName")]
    pub name: String,
    pub keywords: Vec<String>,
}

impl BrandGroup {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }
}

/// One observation: the relative search ratio of a brand for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub brand: String,
    pub period: NaiveDate,
    /// Relative search volume (0..=100 within a request, never negative).
    pub ratio: f64,
}

/// Mean search ratio of one brand over the whole range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanRank {
    pub brand: String,
    pub mean_ratio: f64,
}

/// One slice of the share (pie) view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareSlice {
    pub brand: String,
    pub mean_ratio: f64,
    /// `mean_ratio / Σ mean_ratio`, in `0.0..=1.0`.
    pub share: f64,
}

/// Trailing-window growth of one brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthResult {
    pub brand: String,
    pub growth_percent: f64,
}

/// Inclusive date range plus granularity for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub unit: TimeUnit,
}

impl DateRange {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.start > self.end {
            return Err(AppError::config(format!(
                "Start date {} is after end date {}.",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` date (used by clap and the TUI date editor).
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{}' (expected YYYY-MM-DD): {e}", raw.trim()))
}

/// Default query window: the seven days up to and including yesterday.
pub fn default_date_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let end = today - Duration::days(1);
    let start = today - Duration::days(7);
    (start, end)
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub time_unit: TimeUnit,
    /// Selected categories, in selection order.
    pub categories: Vec<String>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
            unit: self.time_unit,
        }
    }
}
