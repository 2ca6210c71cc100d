mod bootstrap;
mod commands;

use anyhow::{Context, Result};
use sighting_core::settings::Settings;
use sighting_data::SightingStore;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let _log_guard = bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Animal Monitor v{} starting", env!("CARGO_PKG_VERSION"));

    let data_path = bootstrap::resolve_data_path(settings.data.as_deref())?;
    let mut store = SightingStore::open(&data_path)
        .with_context(|| format!("Failed to load sightings from {}", data_path.display()))?;
    settings.save_last_used();

    let command = settings.command();
    tracing::debug!("Running {:?} over {} sightings", command, store.len());

    let stdout = std::io::stdout();
    commands::run(&mut store, &command, &mut stdout.lock())?;

    Ok(())
}
