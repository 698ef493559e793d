//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - request-side types (`BrandGroup`, `TimeUnit`, `DateRange`)
//! - observations and the in-memory table (`SeriesPoint`, `SeriesTable`)
//! - aggregation outputs (`MeanRank`, `ShareSlice`, `GrowthResult`)

pub mod table;
pub mod types;

pub use table::*;
pub use types::*;
