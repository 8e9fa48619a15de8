use thiserror::Error;

/// Failures while obtaining the snapshot. Any of these leaves the view in its
/// error state; nothing is retried.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to fetch snapshot from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("snapshot request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read snapshot file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("ticker {0} is not in the snapshot")]
    TickerNotFound(String),
}
