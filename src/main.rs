use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;

use trader_dashboard::config::{Config, RunMode};
use trader_dashboard::event::AppEvent;
use trader_dashboard::snapshot::spawn_fetch;
use trader_dashboard::ui::chart::ChartPalette;
use trader_dashboard::ui::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load config
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Make sure config/default.toml exists or set TRADER_DASHBOARD_CONFIG");
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with TUI)
    let log_file = std::fs::File::create(&config.logging.file)
        .with_context(|| format!("failed to create {}", config.logging.file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::try_new(&config.logging.level)
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    let mode = RunMode::from_env();
    let source = config
        .snapshot
        .source(mode)
        .context("failed to resolve snapshot source")?;
    tracing::info!(mode = ?mode, source = %source, "Starting trader-dashboard");

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(4);
    let fetch = spawn_fetch(source.clone(), app_tx);

    let palette = ChartPalette {
        up: config.chart.up_color()?,
        down: config.chart.down_color()?,
    };
    let mut app_state = AppState::new(
        &source.to_string(),
        config.ui.default_range()?,
        config.chart.overlays(),
        palette,
    );

    if let Some(path) = std::env::args().nth(1) {
        if !app_state.open_path(&path, &config.snapshot.base_path) {
            tracing::warn!(path = %path, "Unknown route, opening overview");
        }
    }

    // TUI main loop
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, &mut app_state, &mut app_rx, &config);
    ratatui::restore();

    fetch.abort();
    tracing::info!("Shutdown complete");
    result
}

fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app_state: &mut AppState,
    app_rx: &mut mpsc::Receiver<AppEvent>,
    config: &Config,
) -> Result<()> {
    let refresh = Duration::from_millis(config.ui.refresh_rate_ms);
    loop {
        while let Ok(event) = app_rx.try_recv() {
            app_state.apply(event);
        }

        let size = terminal.size()?;
        app_state.set_viewport(size.width);
        terminal.draw(|frame| ui::render(frame, app_state))?;

        // Handle input (non-blocking with timeout)
        if crossterm::event::poll(refresh)? {
            if let Event::Key(key) = crossterm::event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(cmd) = app_state.command_for_key(&key.code) {
                    if app_state.handle(cmd) {
                        tracing::info!("User quit");
                        break;
                    }
                }
            }
        }
    }
    Ok(())
}
