//! Terminal plots for the plain CLI report.

pub mod ascii;

pub use ascii::*;
