//! CSV discovery and loading for the animal monitor.
//!
//! Sightings files are headerless, comma-separated rows of
//! `animal, spotter, count, area, period`. Surrounding whitespace is trimmed,
//! blank lines are skipped and lines starting with `#` are comments.

use std::io::Read;
use std::path::{Path, PathBuf};

use sighting_core::models::{Sighting, SightingRow};
use sighting_core::{MonitorError, Result};
use tracing::{debug, warn};

// ── Loader contract ───────────────────────────────────────────────────────────

/// Anything that can turn a source path into an ordered list of sightings.
///
/// Implementations must either return every record of the source or fail;
/// the store appends whatever is returned without further checks.
pub trait SightingLoader {
    fn load(&self, source: &Path) -> Result<Vec<Sighting>>;
}

/// Reads sightings from a CSV file, or from every `.csv` file below a
/// directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSightingReader;

impl SightingLoader for CsvSightingReader {
    fn load(&self, source: &Path) -> Result<Vec<Sighting>> {
        if !source.exists() {
            return Err(MonitorError::DataPathNotFound(source.to_path_buf()));
        }

        if !source.is_dir() {
            return read_csv_file(source);
        }

        let files = find_csv_files(source);
        if files.is_empty() {
            return Err(MonitorError::NoDataFiles(source.to_path_buf()));
        }

        let mut all = Vec::new();
        for file in &files {
            all.extend(read_csv_file(file)?);
        }

        debug!(
            "Read {} sightings from {} files under {}",
            all.len(),
            files.len(),
            source.display()
        );
        Ok(all)
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `data_path`, sorted by path.
pub fn find_csv_files(data_path: &Path) -> Vec<PathBuf> {
    if !data_path.exists() {
        warn!("Data path does not exist: {}", data_path.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_path)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read every sighting from one CSV file.
pub fn read_csv_file(path: &Path) -> Result<Vec<Sighting>> {
    let file = std::fs::File::open(path).map_err(|source| MonitorError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let sightings = read_sightings(file, path)?;
    debug!("File {}: {} sightings", path.display(), sightings.len());
    Ok(sightings)
}

/// Parse sightings from any reader. `origin` only labels errors.
pub fn read_sightings<R: Read>(reader: R, origin: &Path) -> Result<Vec<Sighting>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut sightings = Vec::new();
    for result in rdr.deserialize::<SightingRow>() {
        let row = result.map_err(|e| map_csv_error(origin, e))?;
        sightings.push(Sighting::from(row));
    }

    Ok(sightings)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Keep I/O failures as read errors; everything else is a malformed row.
fn map_csv_error(origin: &Path, err: csv::Error) -> MonitorError {
    if err.is_io_error() {
        return MonitorError::FileRead {
            path: origin.to_path_buf(),
            source: std::io::Error::from(err),
        };
    }
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    MonitorError::CsvParse {
        path: origin.to_path_buf(),
        line,
        source: err,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    // ── read_sightings ────────────────────────────────────────────────────────

    #[test]
    fn test_read_sightings_column_order() {
        let data = "Mountain Gorilla,0,3,1,0\n";
        let sightings = read_sightings(data.as_bytes(), Path::new("mem")).unwrap();

        assert_eq!(sightings, vec![Sighting::new("Mountain Gorilla", 0, 3, 1, 0)]);
    }

    #[test]
    fn test_read_sightings_trims_and_skips_comments() {
        let data = "# animal,spotter,count,area,period\n\n  fox , 1 , 3 , 1 , 1 \nowl,1,5,2,1\n";
        let sightings = read_sightings(data.as_bytes(), Path::new("mem")).unwrap();

        assert_eq!(sightings.len(), 2);
        assert_eq!(sightings[0].animal(), "fox");
        assert_eq!(sightings[0].count(), 3);
        assert_eq!(sightings[1].animal(), "owl");
    }

    #[test]
    fn test_read_sightings_preserves_order_and_duplicates() {
        let data = "fox,1,3,1,1\nfox,1,3,1,1\nowl,1,5,2,1\n";
        let sightings = read_sightings(data.as_bytes(), Path::new("mem")).unwrap();

        let animals: Vec<&str> = sightings.iter().map(|s| s.animal()).collect();
        assert_eq!(animals, vec!["fox", "fox", "owl"]);
    }

    #[test]
    fn test_read_sightings_accepts_negative_count() {
        let sightings = read_sightings("bat,1,-2,1,1\n".as_bytes(), Path::new("mem")).unwrap();
        assert_eq!(sightings[0].count(), -2);
    }

    #[test]
    fn test_read_sightings_empty_input() {
        let sightings = read_sightings("".as_bytes(), Path::new("mem")).unwrap();
        assert!(sightings.is_empty());
    }

    #[test]
    fn test_read_sightings_type_mismatch_reports_line() {
        let data = "fox,1,3,1,1\nowl,one,5,2,1\n";
        let err = read_sightings(data.as_bytes(), Path::new("s.csv")).unwrap_err();

        match err {
            MonitorError::CsvParse { path, line, .. } => {
                assert_eq!(path, PathBuf::from("s.csv"));
                assert_eq!(line, 2);
            }
            other => panic!("expected CsvParse, got {other:?}"),
        }
    }

    #[test]
    fn test_read_sightings_short_row_fails() {
        let err = read_sightings("fox,1,3\n".as_bytes(), Path::new("s.csv")).unwrap_err();
        assert!(matches!(err, MonitorError::CsvParse { .. }));
    }

    // ── find_csv_files ────────────────────────────────────────────────────────

    #[test]
    fn test_find_csv_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("zone-b");
        std::fs::create_dir_all(&sub).unwrap();
        write_csv(dir.path(), "c.csv", &["x"]);
        write_csv(dir.path(), "a.csv", &["x"]);
        write_csv(dir.path(), "notes.txt", &["x"]);
        write_csv(&sub, "b.csv", &["x"]);

        let files = find_csv_files(dir.path());
        let rel: Vec<PathBuf> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            vec![
                PathBuf::from("a.csv"),
                PathBuf::from("c.csv"),
                PathBuf::from("zone-b").join("b.csv"),
            ]
        );
    }

    #[test]
    fn test_find_csv_files_nonexistent_path() {
        let files = find_csv_files(Path::new("/tmp/does-not-exist-sighting-test-xyz"));
        assert!(files.is_empty());
    }

    // ── CsvSightingReader ─────────────────────────────────────────────────────

    #[test]
    fn test_loader_single_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "sightings.csv", &["fox,1,3,1,1", "owl,1,5,2,1"]);

        let sightings = CsvSightingReader.load(&path).unwrap();
        assert_eq!(sightings.len(), 2);
    }

    #[test]
    fn test_loader_directory_concatenates_in_path_order() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "2.csv", &["owl,1,5,2,1"]);
        write_csv(dir.path(), "1.csv", &["fox,1,3,1,1"]);

        let sightings = CsvSightingReader.load(dir.path()).unwrap();
        let animals: Vec<&str> = sightings.iter().map(|s| s.animal()).collect();
        assert_eq!(animals, vec!["fox", "owl"]);
    }

    #[test]
    fn test_loader_missing_path() {
        let err = CsvSightingReader
            .load(Path::new("/tmp/does-not-exist-sighting-test-xyz.csv"))
            .unwrap_err();
        assert!(matches!(err, MonitorError::DataPathNotFound(_)));
    }

    #[test]
    fn test_loader_directory_without_csv() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "readme.txt", &["nothing here"]);

        let err = CsvSightingReader.load(dir.path()).unwrap_err();
        assert!(matches!(err, MonitorError::NoDataFiles(_)));
    }

    #[test]
    fn test_loader_directory_fails_on_any_bad_file() {
        let dir = TempDir::new().unwrap();
        write_csv(dir.path(), "a.csv", &["fox,1,3,1,1"]);
        write_csv(dir.path(), "b.csv", &["owl,1,many,2,1"]);

        let err = CsvSightingReader.load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("b.csv"));
    }
}
