use std::path::PathBuf;

use anyhow::Result;

use trader_dashboard::config::Config;
use trader_dashboard::export::{export_routes, ExportOptions, DEFAULT_OUT_DIR};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    let config = Config::load()?;
    let opts = ExportOptions::from_config(&config, &out_dir)?;
    let report = export_routes(&opts)?;
    println!(
        "Exported {} page(s) to {} (routes from {:?})",
        report.pages.len(),
        out_dir.display(),
        report.origin
    );
    Ok(())
}
