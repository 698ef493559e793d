//! `brand-trends` library crate.
//!
//! The binary (`trends`) is a thin wrapper around this library so that:
//!
//! - fetching and ranking logic is testable without spawning processes
//! - the CLI report and the TUI dashboard share one pipeline

pub mod analysis;
pub mod app;
pub mod catalog;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod tui;
