use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File name looked up when no `--data` path is given.
pub const DEFAULT_DATA_FILE: &str = "sightings.csv";

// ── Directory bootstrap ────────────────────────────────────────────────────────

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Ensure `~/.animal-monitor/` exists.
pub fn ensure_directories() -> anyhow::Result<()> {
    ensure_directories_in(&home_dir())
}

/// Same as [`ensure_directories`] rooted at `base_dir`.
pub fn ensure_directories_in(base_dir: &Path) -> anyhow::Result<()> {
    let monitor_dir = base_dir.join(".animal-monitor");
    std::fs::create_dir_all(&monitor_dir)
        .with_context(|| format!("Failed to create {}", monitor_dir.display()))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map the CLI level names onto `tracing` filter directives.
fn filter_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr so they never mix with report output on stdout, or to
/// `log_file` when one is given. The returned guard must be held until exit
/// so buffered file output is flushed.
pub fn setup_logging(
    log_level: &str,
    log_file: Option<&PathBuf>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(filter_directive(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_file else {
        let layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        tracing_subscriber::registry().with(filter).with(layer).init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", path.display()))?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(&dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer);
    tracing_subscriber::registry().with(filter).with(layer).init();

    Ok(Some(guard))
}

// ── Data-path discovery ────────────────────────────────────────────────────────

/// Locate a sightings file when none was given.
///
/// Checks in order and returns the first that exists:
/// 1. `./sightings.csv`
/// 2. `~/.animal-monitor/sightings.csv`
pub fn discover_data_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    discover_data_path_in(&cwd, dirs::home_dir().as_deref())
}

/// Same as [`discover_data_path`] with explicit working and home directories.
pub fn discover_data_path_in(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let mut candidates = vec![cwd.join(DEFAULT_DATA_FILE)];
    if let Some(home) = home {
        candidates.push(home.join(".animal-monitor").join(DEFAULT_DATA_FILE));
    }
    candidates.into_iter().find(|p| p.exists())
}

/// Use the explicit path when given, otherwise discover one.
pub fn resolve_data_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    match discover_data_path() {
        Some(path) => {
            tracing::debug!("Using discovered data file {}", path.display());
            Ok(path)
        }
        None => Err(sighting_core::MonitorError::Config(format!(
            "no {DEFAULT_DATA_FILE} found in the working directory or ~/.animal-monitor; pass --data"
        ))
        .into()),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");

        ensure_directories_in(tmp.path()).expect("ensure_directories should succeed");

        let monitor_dir = tmp.path().join(".animal-monitor");
        assert!(monitor_dir.is_dir(), ".animal-monitor dir must exist");
        assert_eq!(std::fs::read_dir(&monitor_dir).expect("read_dir").count(), 0);
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("DEBUG"), "debug");
        assert_eq!(filter_directive("warning"), "warn");
        assert_eq!(filter_directive("ERROR"), "error");
        assert_eq!(filter_directive("INFO"), "info");
        assert_eq!(filter_directive("bogus"), "info");
    }

    #[test]
    fn test_discover_data_path_returns_none_when_absent() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");

        assert!(discover_data_path_in(cwd.path(), Some(home.path())).is_none());
        assert!(discover_data_path_in(cwd.path(), None).is_none());
    }

    #[test]
    fn test_discover_data_path_prefers_working_directory() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        let local = cwd.path().join(DEFAULT_DATA_FILE);
        std::fs::write(&local, "fox,1,3,1,1\n").unwrap();
        ensure_directories_in(home.path()).unwrap();
        std::fs::write(
            home.path().join(".animal-monitor").join(DEFAULT_DATA_FILE),
            "owl,1,5,2,1\n",
        )
        .unwrap();

        assert_eq!(discover_data_path_in(cwd.path(), Some(home.path())), Some(local));
    }

    #[test]
    fn test_discover_data_path_falls_back_to_home() {
        let cwd = TempDir::new().expect("tempdir");
        let home = TempDir::new().expect("tempdir");
        ensure_directories_in(home.path()).unwrap();
        let saved = home.path().join(".animal-monitor").join(DEFAULT_DATA_FILE);
        std::fs::write(&saved, "owl,1,5,2,1\n").unwrap();

        assert_eq!(discover_data_path_in(cwd.path(), Some(home.path())), Some(saved));
    }

    #[test]
    fn test_resolve_data_path_explicit_wins() {
        let path = resolve_data_path(Some(Path::new("/data/s.csv"))).unwrap();
        assert_eq!(path, PathBuf::from("/data/s.csv"));
    }
}
