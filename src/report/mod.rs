//! Presentation: text tables plus chart-ready series.
//!
//! Nothing here feeds back into the analysis; it only shapes results for display.

use chrono::{Duration, NaiveDate};

use crate::domain::SeriesTable;

pub mod format;

pub use format::*;

/// One brand's line, x in days since `TrendChart::origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandSeries {
    pub brand: String,
    pub points: Vec<(f64, f64)>,
}

/// Chart-ready view of a table: x = period, y = ratio, one series per brand.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChart {
    pub origin: NaiveDate,
    pub series: Vec<BrandSeries>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl TrendChart {
    /// Label for an x position (day offset) as `MM-DD`.
    pub fn period_label(&self, x: f64) -> String {
        let date = self.origin + Duration::days(x.round() as i64);
        date.format("%m-%d").to_string()
    }
}

/// Build chart series for every brand in first-seen order.
///
/// Returns `None` for an empty table.
pub fn trend_chart(table: &SeriesTable) -> Option<TrendChart> {
    let (origin, last) = table.period_bounds()?;

    let series: Vec<BrandSeries> = table
        .grouped()
        .into_iter()
        .map(|(brand, points)| BrandSeries {
            brand: brand.to_string(),
            points: points
                .into_iter()
                .map(|(d, r)| ((d - origin).num_days() as f64, r))
                .collect(),
        })
        .collect();

    let mut x1 = (last - origin).num_days() as f64;
    if x1 <= 0.0 {
        x1 = 1.0;
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for s in &series {
        for &(_, y) in &s.points {
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = y_max.max(1.0);
    }
    // Ratios are non-negative; keep the baseline at zero when the data allows it.
    let y_min = y_min.min(0.0);
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);

    Some(TrendChart {
        origin,
        series,
        x_bounds: [0.0, x1],
        y_bounds: [y_min, y_max + pad],
    })
}
