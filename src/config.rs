use anyhow::{bail, Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

use crate::snapshot::SnapshotSource;
use crate::ui::chart::Overlays;
use crate::window::DateRange;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const CONFIG_PATH_ENV: &str = "TRADER_DASHBOARD_CONFIG";
pub const MODE_ENV: &str = "TRADER_DASHBOARD_ENV";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    pub ui: UiConfig,
    pub chart: ChartConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Site root serving the snapshot, e.g. `https://example.github.io`.
    pub base_url: Option<String>,
    /// Deployment prefix, dropped in development mode.
    pub base_path: String,
    pub file_name: String,
    /// Local snapshot file; takes precedence over `base_url`.
    pub path: Option<PathBuf>,
    /// Ticker list used to enumerate routes when no snapshot file exists.
    pub tickers_file: PathBuf,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            base_path: "/trader".to_string(),
            file_name: "history_data.json".to_string(),
            path: None,
            tickers_file: PathBuf::from("tickers.yml"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub default_range: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            default_range: DateRange::default().token().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub up_color: String,
    pub down_color: String,
    pub ma_5: bool,
    pub ma_20: bool,
    pub ma_60: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            up_color: "red".to_string(),
            down_color: "blue".to_string(),
            ma_5: true,
            ma_20: true,
            ma_60: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("trader-dashboard.log"),
        }
    }
}

/// Build/dev toggle. Development serves the snapshot from the site root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Development,
    Production,
}

impl RunMode {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(MODE_ENV).ok().as_deref())
    }

    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "development" || v == "dev" => RunMode::Development,
            _ => RunMode::Production,
        }
    }

    pub fn path_prefix<'a>(&self, base_path: &'a str) -> &'a str {
        match self {
            RunMode::Development => "",
            RunMode::Production => base_path,
        }
    }
}

/// Parse a colour name (`red`, `lightblue`) or hex value (`#ef4444`).
pub fn parse_color(s: &str) -> Result<Color> {
    Color::from_str(s.trim()).map_err(|_| anyhow::anyhow!("invalid colour '{}'", s))
}

impl UiConfig {
    pub fn default_range(&self) -> Result<DateRange> {
        self.default_range
            .parse::<DateRange>()
            .map_err(anyhow::Error::msg)
    }
}

impl ChartConfig {
    pub fn up_color(&self) -> Result<Color> {
        parse_color(&self.up_color)
    }

    pub fn down_color(&self) -> Result<Color> {
        parse_color(&self.down_color)
    }

    pub fn overlays(&self) -> Overlays {
        Overlays {
            ma_5: self.ma_5,
            ma_20: self.ma_20,
            ma_60: self.ma_60,
        }
    }
}

impl SnapshotConfig {
    /// Where the one-shot fetch reads from in `mode`.
    pub fn source(&self, mode: RunMode) -> Result<SnapshotSource> {
        if let Some(path) = &self.path {
            return Ok(SnapshotSource::File(path.clone()));
        }
        let Some(base) = self.base_url.as_deref() else {
            bail!("snapshot.base_url or snapshot.path must be set");
        };
        let mut url = Url::parse(base)
            .with_context(|| format!("invalid snapshot.base_url '{}'", base))?;
        if url.cannot_be_a_base() {
            bail!("snapshot.base_url '{}' cannot be used as a base", base);
        }
        let prefix = mode.path_prefix(&self.base_path).trim_matches('/');
        let root = url.path().trim_matches('/').to_string();
        let file = self.file_name.trim_matches('/');
        let segments: Vec<&str> = [root.as_str(), prefix, file]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        url.set_path(&format!("/{}", segments.join("/")));
        Ok(SnapshotSource::Http(url.to_string()))
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.ui
            .default_range()
            .context("ui.default_range is invalid")?;
        self.chart.up_color().context("chart.up_color is invalid")?;
        self.chart
            .down_color()
            .context("chart.down_color is invalid")?;
        if self.snapshot.file_name.trim_matches('/').is_empty() {
            bail!("snapshot.file_name must not be empty");
        }
        if self.ui.refresh_rate_ms == 0 {
            bail!("ui.refresh_rate_ms must be > 0");
        }
        Ok(())
    }

    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("invalid config {}", config_path.display()))
    }
}
