//! In-memory series table.
//!
//! Points are kept in arrival order. Brands are enumerated in first-seen order,
//! which is also the tie-break order used by the rankings.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::SeriesPoint;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesTable {
    points: Vec<SeriesPoint>,
    #[serde(skip)]
    seen: HashSet<(String, NaiveDate)>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point. Returns `false` (and drops the point) when the brand
    /// already has an observation for that period.
    pub fn push(&mut self, point: SeriesPoint) -> bool {
        let key = (point.brand.clone(), point.period);
        if !self.seen.insert(key) {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Append every point, returning how many duplicates were dropped.
    pub fn extend(&mut self, points: impl IntoIterator<Item = SeriesPoint>) -> usize {
        let mut dropped = 0;
        for p in points {
            if !self.push(p) {
                dropped += 1;
            }
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Distinct brands in first-seen order.
    pub fn brands(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for p in &self.points {
            if seen.insert(p.brand.as_str()) {
                out.push(p.brand.as_str());
            }
        }
        out
    }

    /// Chronologically sorted `(period, ratio)` pairs for one brand.
    pub fn series_for(&self, brand: &str) -> Vec<(NaiveDate, f64)> {
        let mut out: Vec<(NaiveDate, f64)> = self
            .points
            .iter()
            .filter(|p| p.brand == brand)
            .map(|p| (p.period, p.ratio))
            .collect();
        out.sort_by_key(|(d, _)| *d);
        out
    }

    /// Every brand's series, brands in first-seen order.
    pub fn grouped(&self) -> Vec<(&str, Vec<(NaiveDate, f64)>)> {
        self.brands()
            .into_iter()
            .map(|b| (b, self.series_for(b)))
            .collect()
    }

    /// Earliest and latest period in the table.
    pub fn period_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.points.iter().map(|p| p.period).min()?;
        let max = self.points.iter().map(|p| p.period).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(brand: &str, day: u32, ratio: f64) -> SeriesPoint {
        SeriesPoint {
            brand: brand.to_string(),
            period: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            ratio,
        }
    }

    #[test]
    fn series_sorted_regardless_of_arrival_order() {
        let mut table = SeriesTable::new();
        table.extend([point("A", 3, 30.0), point("A", 1, 10.0), point("A", 2, 20.0)]);

        let ratios: Vec<f64> = table.series_for("A").into_iter().map(|(_, r)| r).collect();
        assert_eq!(ratios, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn duplicate_period_is_dropped() {
        let mut table = SeriesTable::new();
        assert!(table.push(point("A", 1, 10.0)));
        assert!(!table.push(point("A", 1, 99.0)));
        assert!(table.push(point("B", 1, 99.0)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.series_for("A"), vec![(point("A", 1, 0.0).period, 10.0)]);
    }

    #[test]
    fn brands_in_first_seen_order() {
        let mut table = SeriesTable::new();
        table.extend([point("B", 1, 1.0), point("A", 1, 1.0), point("B", 2, 1.0)]);
        assert_eq!(table.brands(), vec!["B", "A"]);
    }
}
