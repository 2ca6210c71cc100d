use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Report on wildlife sightings recorded by spotters
#[derive(Parser, Debug, Clone)]
#[command(
    name = "animal-monitor",
    about = "Report on wildlife sightings recorded by spotters",
    version
)]
pub struct Settings {
    /// Sightings CSV file, or a directory of CSV files
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long, global = true)]
    pub clear: bool,

    /// Report to produce (defaults to `list`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Reports and mutations available on the loaded sightings.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print details of every sighting
    List,
    /// Print every sighting of an animal
    Animal { animal: String },
    /// Print every sighting in a period
    Period { period: u32 },
    /// Print sightings of an animal within a period
    AnimalPeriod { animal: String, period: u32 },
    /// Print every sighting recorded by a spotter
    Spotter { spotter: u32 },
    /// Print the total count of an animal
    Count { animal: String },
    /// Print animals whose total count is at or below a threshold
    Endangered {
        /// Counts less than or equal to this are endangered
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i64>,
    },
    /// Drop zero-count sightings and print what remains
    Purge,
    /// Print sightings of an animal in one area
    Area { animal: String, area: u32 },
    /// Print per-animal totals
    Summary,
}

impl Settings {
    /// The requested command, falling back to `list`.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::List)
    }

    /// Threshold carried by an `endangered` command, if any.
    pub fn threshold(&self) -> Option<i64> {
        match &self.command {
            Some(Command::Endangered { threshold }) => *threshold,
            _ => None,
        }
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.animal-monitor/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<i64>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".animal-monitor").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge with last-used params where no explicit
    /// CLI value was provided. Nothing is persisted here; call
    /// [`Settings::save_last_used`] once the data path has loaded.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation, taking args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            if let Err(e) = LastUsedParams::clear_at(config_path) {
                tracing::warn!("Failed to clear {}: {}", config_path.display(), e);
            }
            return Self::apply_debug(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if settings.data.is_none() {
            settings.data = last.data;
        }
        if let Some(Command::Endangered { threshold }) = settings.command.as_mut() {
            if threshold.is_none() {
                *threshold = last.threshold;
            }
        }

        Self::apply_debug(settings)
    }

    /// Persist this run's data path and threshold to the default config path.
    pub fn save_last_used(&self) {
        self.save_last_used_to(&LastUsedParams::config_path())
    }

    /// Persist to an explicit path. A `--clear` run saves nothing, and the
    /// previous threshold is kept when this run did not use one.
    pub fn save_last_used_to(&self, config_path: &std::path::Path) {
        if self.clear {
            return;
        }

        let last = LastUsedParams::load_from(config_path);
        let params = LastUsedParams {
            data: self.data.clone(),
            threshold: self.threshold().or(last.threshold),
        };
        if params != last {
            if let Err(e) = params.save_to(config_path) {
                tracing::warn!("Failed to save {}: {}", config_path.display(), e);
            }
        }
    }

    /// `--debug` overrides the log level.
    fn apply_debug(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
