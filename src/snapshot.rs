use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::SnapshotError;
use crate::event::AppEvent;
use crate::model::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotSource {
    Http(String),
    File(PathBuf),
}

impl fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotSource::Http(url) => f.write_str(url),
            SnapshotSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse a complete snapshot document. Partial documents are rejected.
pub fn parse_snapshot(bytes: &[u8]) -> Result<Snapshot, SnapshotError> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn load_snapshot_file(path: &Path) -> Result<Snapshot, SnapshotError> {
    let bytes = std::fs::read(path).map_err(|source| SnapshotError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_snapshot(&bytes)
}

/// One attempt, no retry and no client timeout.
pub async fn fetch_snapshot(source: &SnapshotSource) -> Result<Snapshot, SnapshotError> {
    match source {
        SnapshotSource::File(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .map_err(|source| SnapshotError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
            parse_snapshot(&bytes)
        }
        SnapshotSource::Http(url) => {
            let fetch_err = |source: reqwest::Error| SnapshotError::Fetch {
                url: url.clone(),
                source,
            };
            let resp = reqwest::Client::new()
                .get(url)
                .send()
                .await
                .map_err(fetch_err)?;
            let status = resp.status();
            if !status.is_success() {
                return Err(SnapshotError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let body = resp.bytes().await.map_err(fetch_err)?;
            parse_snapshot(&body)
        }
    }
}

/// Run the page-load fetch in the background and report exactly one event.
pub fn spawn_fetch(
    source: SnapshotSource,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(source = %source, "Fetching snapshot");
        let event = match fetch_snapshot(&source).await {
            Ok(snapshot) => {
                tracing::info!(
                    tickers = snapshot.tickers.len(),
                    days = snapshot.signals_history.len(),
                    last_update = %snapshot.last_update,
                    "Snapshot loaded"
                );
                AppEvent::SnapshotLoaded(Arc::new(snapshot))
            }
            Err(e) => {
                tracing::error!(source = %source, error = %e, "Failed to load snapshot");
                AppEvent::SnapshotFailed(e.to_string())
            }
        };
        if tx.send(event).await.is_err() {
            tracing::debug!("Snapshot receiver dropped before load finished");
        }
    })
}
