mod app;
mod color;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use app::RedbusDashboardApp;
use redbus_dashboard::config::Config;
use redbus_dashboard::data::cache::TableCache;
use redbus_dashboard::data::summary::Summary;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();

    if config.summary {
        return print_summary(&config);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Redbus Data Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(RedbusDashboardApp::new(&config)))),
    )
    .map_err(|e| anyhow!("failed to start the dashboard window: {e}"))
}

/// Headless mode: load once and print the overall metrics as JSON.
fn print_summary(config: &Config) -> Result<()> {
    let cache = TableCache::new(config.cache_ttl());
    let table = cache
        .get_or_load(&config.data_dir)
        .with_context(|| format!("loading {}", config.data_dir.display()))?;
    if table.is_empty() {
        log::warn!("No CSV files found or no data loaded in {}", config.data_dir.display());
    }
    let summary = Summary::of(&table);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
