//! Aggregation over the fetched series.
//!
//! - mean-ratio ranking (top 10)
//! - share-of-total view (pie)
//! - trailing 4-period growth ranking (top 5)

pub mod rankings;

pub use rankings::*;
