//! Static export: renders every enumerable route to a text screen, the way a
//! static site build pre-renders each page.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use crate::config::Config;
use crate::event::AppEvent;
use crate::routes::{static_routes, Route, RouteOrigin};
use crate::snapshot::load_snapshot_file;
use crate::ui::chart::{ChartPalette, Overlays};
use crate::ui::{self, AppState};
use crate::window::DateRange;

pub const DEFAULT_OUT_DIR: &str = "dist";
pub const DEFAULT_SNAPSHOT_PATH: &str = "docs/history_data.json";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub snapshot_path: PathBuf,
    pub tickers_file: PathBuf,
    pub out_dir: PathBuf,
    pub width: u16,
    pub height: u16,
    pub range: DateRange,
    pub overlays: Overlays,
    pub palette: ChartPalette,
}

impl ExportOptions {
    pub fn from_config(config: &Config, out_dir: &Path) -> Result<Self> {
        Ok(Self {
            snapshot_path: config
                .snapshot
                .path
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            tickers_file: config.snapshot.tickers_file.clone(),
            out_dir: out_dir.to_path_buf(),
            width: 160,
            height: 48,
            range: config.ui.default_range()?,
            overlays: config.chart.overlays(),
            palette: ChartPalette {
                up: config.chart.up_color()?,
                down: config.chart.down_color()?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedRoute {
    pub route: Route,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub origin: RouteOrigin,
    pub pages: Vec<ExportedRoute>,
}

pub fn render_to_text(state: &AppState, width: u16, height: u16) -> Result<String> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).context("failed to init test terminal")?;
    terminal
        .draw(|frame| ui::render(frame, state))
        .context("failed to render frame")?;
    let buf = terminal.backend().buffer();
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        let mut line = String::new();
        for x in 0..area.width {
            line.push_str(buf[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    Ok(out)
}

/// Render `/` and every detail route into `out_dir`. A missing or malformed
/// snapshot still exports the enumerable routes, each in its error state.
pub fn export_routes(opts: &ExportOptions) -> Result<ExportReport> {
    let routes = static_routes(&opts.snapshot_path, &opts.tickers_file);
    let event = match load_snapshot_file(&opts.snapshot_path) {
        Ok(snapshot) => AppEvent::SnapshotLoaded(Arc::new(snapshot)),
        Err(e) => AppEvent::SnapshotFailed(e.to_string()),
    };

    let source = opts.snapshot_path.display().to_string();
    let mut state = AppState::new(&source, opts.range, opts.overlays, opts.palette);
    state.set_viewport(opts.width);
    state.apply(event);

    let mut pages = Vec::with_capacity(routes.routes.len());
    for route in routes.routes {
        state.navigate(route.clone());
        let text = render_to_text(&state, opts.width, opts.height)?;
        let path = opts.out_dir.join(route.export_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(route = %route, path = %path.display(), "Exported route");
        pages.push(ExportedRoute { route, path });
    }

    Ok(ExportReport {
        origin: routes.origin,
        pages,
    })
}
