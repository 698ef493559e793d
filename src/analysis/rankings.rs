//! Rankings derived from a `SeriesTable`.
//!
//! All functions here are pure: the same table always yields the same output.
//! Sorting is stable, so brands with equal scores keep first-seen order.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{GrowthResult, MeanRank, SeriesTable, ShareSlice};

/// Rows shown in the mean ranking.
pub const MEAN_TOP_N: usize = 10;
/// Rows shown in the growth ranking.
pub const GROWTH_TOP_N: usize = 5;
/// Trailing points compared by the growth ranking (split into two halves).
pub const GROWTH_WINDOW: usize = 4;
/// Growth (in percent) must exceed this to count as a rise.
pub const GROWTH_MIN_PERCENT: f64 = 0.05;

/// All three views for one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rankings {
    pub mean: Vec<MeanRank>,
    pub share: Vec<ShareSlice>,
    pub growth: Vec<GrowthResult>,
}

pub fn aggregate(table: &SeriesTable) -> Rankings {
    Rankings {
        mean: mean_ranking(table, MEAN_TOP_N),
        share: share_view(table),
        growth: growth_ranking(table, GROWTH_TOP_N),
    }
}

/// Mean ratio per brand, brands in first-seen order.
pub fn brand_means(table: &SeriesTable) -> Vec<MeanRank> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut acc: Vec<(&str, f64, usize)> = Vec::new();

    for p in table.points() {
        let slot = *index.entry(p.brand.as_str()).or_insert_with(|| {
            acc.push((p.brand.as_str(), 0.0, 0));
            acc.len() - 1
        });
        acc[slot].1 += p.ratio;
        acc[slot].2 += 1;
    }

    acc.into_iter()
        .map(|(brand, sum, n)| MeanRank {
            brand: brand.to_string(),
            mean_ratio: sum / n as f64,
        })
        .collect()
}

/// Brands by descending mean ratio, top `top_n`.
pub fn mean_ranking(table: &SeriesTable, top_n: usize) -> Vec<MeanRank> {
    let mut means = brand_means(table);
    means.sort_by(|a, b| desc(a.mean_ratio, b.mean_ratio));
    means.truncate(top_n);
    means
}

/// Every brand's mean ratio with its proportion of the total.
///
/// Shares are `mean / Σ mean`; when every mean is zero the shares are zero too.
pub fn share_view(table: &SeriesTable) -> Vec<ShareSlice> {
    let mut means = brand_means(table);
    means.sort_by(|a, b| desc(a.mean_ratio, b.mean_ratio));

    let total: f64 = means.iter().map(|m| m.mean_ratio).sum();
    means
        .into_iter()
        .map(|m| ShareSlice {
            share: if total > 0.0 { m.mean_ratio / total } else { 0.0 },
            brand: m.brand,
            mean_ratio: m.mean_ratio,
        })
        .collect()
}

/// Growth of the trailing window for one chronologically sorted series.
///
/// Returns `None` for short series and for a non-positive first-half baseline.
/// The result is rounded to two decimals.
pub fn window_growth(series: &[(NaiveDate, f64)]) -> Option<f64> {
    if series.len() < GROWTH_WINDOW {
        return None;
    }
    let window = &series[series.len() - GROWTH_WINDOW..];
    let (first, second) = window.split_at(GROWTH_WINDOW / 2);

    let first_avg = mean(first);
    let second_avg = mean(second);
    if first_avg.is_nan() || first_avg <= 0.0 {
        return None;
    }

    let growth = (second_avg - first_avg) / first_avg * 100.0;
    growth.is_finite().then(|| round2(growth))
}

/// Brands whose trailing-window growth exceeds `GROWTH_MIN_PERCENT`,
/// descending, top `top_n`.
pub fn growth_ranking(table: &SeriesTable, top_n: usize) -> Vec<GrowthResult> {
    let mut out: Vec<GrowthResult> = table
        .grouped()
        .into_iter()
        .filter_map(|(brand, series)| {
            window_growth(&series).map(|g| GrowthResult {
                brand: brand.to_string(),
                growth_percent: g,
            })
        })
        .filter(|g| g.growth_percent > GROWTH_MIN_PERCENT)
        .collect();

    out.sort_by(|a, b| desc(a.growth_percent, b.growth_percent));
    out.truncate(top_n);
    out
}

fn mean(points: &[(NaiveDate, f64)]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|(_, r)| r).sum::<f64>() / points.len() as f64
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SeriesPoint;

    fn table(rows: &[(&str, &[f64])]) -> SeriesTable {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let mut t = SeriesTable::new();
        for (brand, ratios) in rows {
            for (i, r) in ratios.iter().enumerate() {
                t.push(SeriesPoint {
                    brand: brand.to_string(),
                    period: start + chrono::Duration::days(i as i64),
                    ratio: *r,
                });
            }
        }
        t
    }

    fn names<T>(rows: &[T], f: impl Fn(&T) -> &str) -> Vec<String> {
        rows.iter().map(|r| f(r).to_string()).collect()
    }

    #[test]
    fn mean_ranking_orders_by_mean() {
        let t = table(&[("B", &[5.0, 5.0]), ("A", &[10.0, 20.0])]);
        let ranking = mean_ranking(&t, MEAN_TOP_N);
        assert_eq!(names(&ranking, |r| r.brand.as_str()), vec!["A", "B"]);
        assert_eq!(ranking[0].mean_ratio, 15.0);
        assert_eq!(ranking[1].mean_ratio, 5.0);
    }

    #[test]
    fn mean_ranking_ties_keep_first_seen_order_and_truncate() {
        let rows: Vec<(String, Vec<f64>)> = (0..12).map(|i| (format!("b{i:02}"), vec![1.0])).collect();
        let refs: Vec<(&str, &[f64])> = rows.iter().map(|(n, r)| (n.as_str(), r.as_slice())).collect();
        let ranking = mean_ranking(&table(&refs), MEAN_TOP_N);
        assert_eq!(ranking.len(), 10);
        assert_eq!(ranking[0].brand, "b00");
        assert_eq!(ranking[9].brand, "b09");
    }

    #[test]
    fn share_is_mean_over_total() {
        let t = table(&[("A", &[30.0]), ("B", &[10.0])]);
        let shares = share_view(&t);
        assert_eq!(names(&shares, |s| s.brand.as_str()), vec!["A", "B"]);
        assert!((shares[0].share - 0.75).abs() < 1e-12);
        assert!((shares[1].share - 0.25).abs() < 1e-12);
        assert_eq!(shares[1].mean_ratio, 10.0);
    }

    #[test]
    fn share_of_all_zero_means_is_zero() {
        let shares = share_view(&table(&[("A", &[0.0]), ("B", &[0.0])]));
        assert!(shares.iter().all(|s| s.share == 0.0));
    }

    #[test]
    fn growth_doubling_is_one_hundred_percent() {
        let t = table(&[("A", &[10.0, 10.0, 20.0, 20.0])]);
        let growth = growth_ranking(&t, GROWTH_TOP_N);
        assert_eq!(growth.len(), 1);
        assert_eq!(growth[0].growth_percent, 100.0);
    }

    #[test]
    fn growth_uses_only_trailing_window() {
        let t = table(&[("A", &[0.0, 99.0, 10.0, 10.0, 15.0, 15.0])]);
        let growth = growth_ranking(&t, GROWTH_TOP_N);
        assert_eq!(growth[0].growth_percent, 50.0);
    }

    #[test]
    fn falling_flat_and_zero_baseline_are_excluded() {
        let t = table(&[
            ("falling", &[10.0, 10.0, 0.0, 0.0]),
            ("flat", &[10.0, 10.0, 10.0, 10.0]),
            ("zero_base", &[0.0, 0.0, 20.0, 20.0]),
            ("short", &[1.0, 50.0]),
        ]);
        assert!(growth_ranking(&t, GROWTH_TOP_N).is_empty());
        assert_eq!(window_growth(&t.series_for("falling")), Some(-100.0));
        assert_eq!(window_growth(&t.series_for("zero_base")), None);
        assert_eq!(window_growth(&t.series_for("short")), None);
    }

    #[test]
    fn growth_below_threshold_is_noise() {
        // 0.04% rise rounds to 0.04 and stays under the threshold.
        let t = table(&[("A", &[100.0, 100.0, 100.04, 100.04])]);
        assert!(growth_ranking(&t, GROWTH_TOP_N).is_empty());
    }

    #[test]
    fn growth_ranking_sorted_and_capped() {
        let t = table(&[
            ("g10", &[10.0, 10.0, 11.0, 11.0]),
            ("g50", &[10.0, 10.0, 15.0, 15.0]),
            ("g20", &[10.0, 10.0, 12.0, 12.0]),
            ("g30", &[10.0, 10.0, 13.0, 13.0]),
            ("g40", &[10.0, 10.0, 14.0, 14.0]),
            ("g60", &[10.0, 10.0, 16.0, 16.0]),
        ]);
        let growth = growth_ranking(&t, GROWTH_TOP_N);
        assert_eq!(names(&growth, |g| g.brand.as_str()), vec!["g60", "g50", "g40", "g30", "g20"]);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let t = table(&[("A", &[1.0, 2.0, 3.0, 4.0]), ("B", &[4.0, 3.0, 2.0, 8.0])]);
        assert_eq!(aggregate(&t), aggregate(&t));
    }

    #[test]
    fn empty_table_yields_empty_views() {
        let r = aggregate(&SeriesTable::new());
        assert!(r.mean.is_empty() && r.share.is_empty() && r.growth.is_empty());
    }
}
