//! NAVER DataLab search-trend API integration.
//!
//! Keyword groups are sent in chunks of at most five (the API limit), one
//! blocking request per chunk. A failing chunk is recorded and skipped; the
//! sweep always runs to the end.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{BrandGroup, DateRange, SeriesPoint, SeriesTable};
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://openapi.naver.com";
const SEARCH_PATH: &str = "/v1/datalab/search";

/// DataLab rejects requests with more keyword groups than this.
pub const MAX_GROUPS_PER_REQUEST: usize = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_CLIENT_ID: &str = "NAVER_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
const ENV_BASE_URL: &str = "NAVER_DATALAB_URL";

/// Opaque API credentials, sent as the `X-Naver-Client-*` headers.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let client_id = std::env::var(ENV_CLIENT_ID)
            .map_err(|_| AppError::config(format!("Missing {ENV_CLIENT_ID} in environment (.env).")))?;
        let client_secret = std::env::var(ENV_CLIENT_SECRET)
            .map_err(|_| AppError::config(format!("Missing {ENV_CLIENT_SECRET} in environment (.env).")))?;
        Ok(Self::new(client_id, client_secret))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// Why a single chunk produced no data.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ChunkError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// A chunk that was skipped, with the brands it would have covered.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkFailure {
    /// Zero-based chunk index.
    pub index: usize,
    pub groups: Vec<String>,
    pub error: ChunkError,
}

/// Result of a full sweep: whatever succeeded plus what did not.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub table: SeriesTable,
    pub failures: Vec<ChunkFailure>,
    pub chunks: usize,
}

/// Split groups into request-sized chunks, preserving order.
pub fn chunk_groups(groups: &[BrandGroup]) -> Vec<&[BrandGroup]> {
    groups.chunks(MAX_GROUPS_PER_REQUEST).collect()
}

pub struct DataLabClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl DataLabClient {
    pub fn new(credentials: Credentials, base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Credentials from the environment; `NAVER_DATALAB_URL` overrides the host.
    pub fn from_env(timeout: Duration) -> Result<Self, AppError> {
        let credentials = Credentials::from_env()?;
        let base_url = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(credentials, base_url, timeout)
    }

    /// Fetch every group, one sequential request per chunk.
    ///
    /// Only argument validation fails the whole call; per-chunk problems end up
    /// in `FetchOutcome::failures`.
    pub fn fetch_table(&self, range: &DateRange, groups: &[BrandGroup]) -> Result<FetchOutcome, AppError> {
        range.validate()?;
        if groups.is_empty() {
            return Err(AppError::config("No keyword groups to query."));
        }

        let chunks = chunk_groups(groups);
        let mut outcome = FetchOutcome {
            chunks: chunks.len(),
            ..FetchOutcome::default()
        };

        for (index, chunk) in chunks.into_iter().enumerate() {
            info!(chunk = index, groups = chunk.len(), "fetching keyword chunk");
            match self.fetch_chunk(range, chunk) {
                Ok(points) => {
                    let n = points.len();
                    let dropped = outcome.table.extend(points);
                    if dropped > 0 {
                        warn!(chunk = index, dropped, "dropped duplicate periods");
                    }
                    debug!(chunk = index, points = n, "chunk fetched");
                }
                Err(error) => {
                    warn!(chunk = index, %error, "chunk failed; continuing");
                    outcome.failures.push(ChunkFailure {
                        index,
                        groups: chunk.iter().map(|g| g.name.clone()).collect(),
                        error,
                    });
                }
            }
        }

        info!(
            points = outcome.table.len(),
            failed_chunks = outcome.failures.len(),
            "sweep finished"
        );
        Ok(outcome)
    }

    fn fetch_chunk(&self, range: &DateRange, chunk: &[BrandGroup]) -> Result<Vec<SeriesPoint>, ChunkError> {
        let body = SearchRequest {
            start_date: range.start.format("%Y-%m-%d").to_string(),
            end_date: range.end.format("%Y-%m-%d").to_string(),
            time_unit: range.unit.api_value(),
            keyword_groups: chunk,
        };

        let resp = self
            .client
            .post(format!("{}{SEARCH_PATH}", self.base_url))
            .header("X-Naver-Client-Id", &self.credentials.client_id)
            .header("X-Naver-Client-Secret", &self.credentials.client_secret)
            .json(&body)
            .send()
            .map_err(|e| ChunkError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| ChunkError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ChunkError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_results(&text)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest<'a> {
    start_date: String,
    end_date: String,
    time_unit: &'static str,
    keyword_groups: &'a [BrandGroup],
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<ResultItem>,
}

#[derive(Debug, Deserialize)]
struct ResultItem {
    title: String,
    data: Vec<DataItem>,
}

#[derive(Debug, Deserialize)]
struct DataItem {
    period: String,
    ratio: f64,
}

/// Parse a success body into points, rejecting anything that doesn't fit.
pub fn parse_results(body: &str) -> Result<Vec<SeriesPoint>, ChunkError> {
    let parsed: SearchResponse =
        serde_json::from_str(body).map_err(|e| ChunkError::Malformed(e.to_string()))?;

    let mut out = Vec::new();
    for item in parsed.results {
        for d in item.data {
            let period = NaiveDate::parse_from_str(&d.period, "%Y-%m-%d").map_err(|e| {
                ChunkError::Malformed(format!("invalid period '{}' for '{}': {e}", d.period, item.title))
            })?;
            if !(d.ratio.is_finite() && d.ratio >= 0.0) {
                return Err(ChunkError::Malformed(format!(
                    "invalid ratio {} for '{}' at {period}",
                    d.ratio, item.title
                )));
            }
            out.push(SeriesPoint {
                brand: item.title.clone(),
                period,
                ratio: d.ratio,
            });
        }
    }
    Ok(out)
}
