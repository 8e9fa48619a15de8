use std::fmt;
use std::path::{Path, PathBuf};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;

use crate::snapshot::load_snapshot_file;

/// Characters left as-is in a ticker path segment (`7203.T`, `BRK-B`).
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Overview,
    Detail(String),
}

impl Route {
    pub fn detail(code: impl Into<String>) -> Self {
        Route::Detail(code.into())
    }

    /// Parse `/` or `/stocks/<code>`; the code is percent-decoded.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Overview),
            ["stocks", code] => {
                let decoded = percent_decode_str(code).decode_utf8().ok()?;
                let decoded = decoded.trim();
                if decoded.is_empty() {
                    None
                } else {
                    Some(Route::Detail(decoded.to_string()))
                }
            }
            _ => None,
        }
    }

    /// Like [`Route::parse`], accepting paths under the deployment prefix.
    pub fn parse_with_base(path: &str, base_path: &str) -> Option<Self> {
        let base = base_path.trim_end_matches('/');
        let stripped = if base.is_empty() {
            path
        } else {
            match path.strip_prefix(base) {
                Some(rest) if rest.is_empty() || rest.starts_with(['/', '?', '#']) => rest,
                _ => path,
            }
        };
        Self::parse(stripped)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Overview => "/".to_string(),
            Route::Detail(code) => format!("/stocks/{}", utf8_percent_encode(code, SEGMENT)),
        }
    }

    /// Output file of this route relative to the export directory.
    pub fn export_path(&self) -> PathBuf {
        match self {
            Route::Overview => PathBuf::from("index.txt"),
            Route::Detail(code) => {
                PathBuf::from("stocks").join(format!("{}.txt", utf8_percent_encode(code, SEGMENT)))
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the detail routes were enumerated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOrigin {
    Snapshot,
    TickersFile,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoutes {
    pub origin: RouteOrigin,
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct TickersFile {
    #[serde(default)]
    tickers: Vec<TickerEntry>,
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    code: String,
}

pub fn tickers_file_codes(path: &Path) -> anyhow::Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)?;
    let file: TickersFile = serde_yaml::from_str(&raw)?;
    Ok(file
        .tickers
        .into_iter()
        .map(|t| t.code.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect())
}

/// The overview route plus one detail route per ticker. Tickers come from
/// the snapshot, then the tickers file; with neither only `/` is listed.
pub fn static_routes(snapshot_path: &Path, tickers_file: &Path) -> StaticRoutes {
    let (origin, codes) = match load_snapshot_file(snapshot_path) {
        Ok(snapshot) => (
            RouteOrigin::Snapshot,
            snapshot.ticker_codes().map(str::to_string).collect(),
        ),
        Err(snapshot_err) => {
            tracing::warn!(
                path = %snapshot_path.display(),
                error = %snapshot_err,
                "Snapshot unavailable, falling back to tickers file"
            );
            match tickers_file_codes(tickers_file) {
                Ok(codes) => (RouteOrigin::TickersFile, codes),
                Err(e) => {
                    tracing::warn!(
                        path = %tickers_file.display(),
                        error = %e,
                        "Tickers file unavailable, no detail routes"
                    );
                    (RouteOrigin::None, Vec::new())
                }
            }
        }
    };

    let mut routes = vec![Route::Overview];
    for code in codes {
        let route = Route::Detail(code);
        if !routes.contains(&route) {
            routes.push(route);
        }
    }
    StaticRoutes { origin, routes }
}
