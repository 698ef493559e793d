//! Output helpers.
//!
//! - raw series CSV and full-report JSON exports (`export`)

pub mod export;

pub use export::*;
