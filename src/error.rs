use thiserror::Error;

/// A row that could not be turned into a `UserRecord`.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("record {index} ({id}): score {score} is outside 0..=100")]
    ScoreOutOfRange { index: usize, id: String, score: i64 },
    #[error("record {index} ({id}): exposure {exposure} must be a finite, non-negative amount")]
    InvalidExposure {
        index: usize,
        id: String,
        exposure: f64,
    },
    #[error("record {index} ({id}): unrecognized status '{status}'")]
    UnknownStatus {
        index: usize,
        id: String,
        status: String,
    },
    #[error("malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("unable to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported input format '{0}', expected .json or .csv")]
    UnsupportedFormat(String),
}

/// Failure talking to the risk-engine API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("user '{0}' not found")]
    NotFound(String),
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("document rendering failed: {0}")]
    Render(String),
    #[error("unable to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SENTINEL_API_URL must start with http:// or https://, got '{0}'")]
    InvalidUrl(String),
    #[error("SENTINEL_HTTP_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),
}
