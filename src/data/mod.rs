//! Data sources.
//!
//! - NAVER DataLab search trends (`datalab`)

pub mod datalab;

pub use datalab::{
    ChunkError, ChunkFailure, Credentials, DataLabClient, FetchOutcome, chunk_groups, parse_results,
};
