//! In-memory store of sightings and the reports that run over it.
//!
//! Every query is a linear scan in insertion order. Reports come in two
//! forms: `write_*` renders to any [`std::io::Write`], `print_*` renders to
//! stdout. Neither form fails on an empty store or on a miss.

use std::io::{self, Write};
use std::path::Path;

use sighting_core::formatting::{format_count_line, format_endangered_line};
use sighting_core::{Result, Sighting};
use tracing::info;

use crate::reader::{CsvSightingReader, SightingLoader};

/// Ordered collection of sightings. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SightingStore {
    sightings: Vec<Sighting>,
}

impl SightingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already loaded list of sightings.
    pub fn from_sightings(sightings: Vec<Sighting>) -> Self {
        Self { sightings }
    }

    /// Create a store holding the sightings read from `source`.
    pub fn open(source: &Path) -> Result<Self> {
        let mut store = Self::new();
        store.load(source)?;
        Ok(store)
    }

    // ── Loading and adding ────────────────────────────────────────────────────

    /// Append every sighting in the CSV `source` (file or directory).
    ///
    /// Returns the number of sightings appended. On error the store is left
    /// unchanged.
    pub fn load(&mut self, source: &Path) -> Result<usize> {
        self.load_with(&CsvSightingReader, source)
    }

    /// Append every sighting `loader` produces for `source`.
    pub fn load_with<L>(&mut self, loader: &L, source: &Path) -> Result<usize>
    where
        L: SightingLoader + ?Sized,
    {
        let loaded = loader.load(source)?;
        let added = loaded.len();
        self.sightings.extend(loaded);
        info!(
            "Loaded {} sightings from {} ({} total)",
            added,
            source.display(),
            self.sightings.len()
        );
        Ok(added)
    }

    /// Append a single sighting.
    pub fn add(&mut self, sighting: Sighting) {
        self.sightings.push(sighting);
    }

    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sighting> {
        self.sightings.iter()
    }

    pub fn as_slice(&self) -> &[Sighting] {
        &self.sightings
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// All sightings of `animal`, in store order.
    pub fn sightings_of(&self, animal: &str) -> Vec<&Sighting> {
        self.filter(|s| s.animal() == animal)
    }

    /// All sightings of `animal` in `area`, in store order.
    pub fn sightings_in_area(&self, animal: &str, area: u32) -> Vec<&Sighting> {
        self.filter(|s| s.animal() == animal && s.area() == area)
    }

    pub fn sightings_in_period(&self, period: u32) -> Vec<&Sighting> {
        self.filter(|s| s.period() == period)
    }

    pub fn sightings_of_in_period(&self, animal: &str, period: u32) -> Vec<&Sighting> {
        self.filter(|s| s.animal() == animal && s.period() == period)
    }

    /// All sightings recorded by `spotter`.
    pub fn sightings_by(&self, spotter: u32) -> Vec<&Sighting> {
        self.filter(|s| s.spotter() == spotter)
    }

    /// Total count of `animal` across all sightings; 0 when there are none.
    /// Saturates at the `i64` bounds instead of overflowing.
    pub fn count_of(&self, animal: &str) -> i64 {
        self.sightings
            .iter()
            .filter(|s| s.animal() == animal)
            .fold(0i64, |total, s| total.saturating_add(s.count()))
    }

    /// Distinct animal names in order of first appearance.
    pub fn animal_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for sighting in &self.sightings {
            if !names.contains(&sighting.animal()) {
                names.push(sighting.animal());
            }
        }
        names
    }

    /// Animals whose total count is less than or equal to `threshold`, in
    /// order of first appearance.
    pub fn endangered(&self, threshold: i64) -> Vec<&str> {
        self.animal_names()
            .into_iter()
            .filter(|name| self.count_of(name) <= threshold)
            .collect()
    }

    // ── Mutation ──────────────────────────────────────────────────────────────

    /// Drop every sighting whose count is exactly zero, keeping the order of
    /// the rest. Returns how many were removed.
    pub fn remove_zero_counts(&mut self) -> usize {
        let before = self.sightings.len();
        self.sightings.retain(|s| s.count() != 0);
        let removed = before - self.sightings.len();
        info!("Removed {} zero-count sightings", removed);
        removed
    }

    // ── Reports ───────────────────────────────────────────────────────────────

    /// Write the details of every sighting, one per line.
    pub fn write_all<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write_details(out, &self.sightings)
    }

    pub fn write_sightings_of<W: Write>(&self, out: &mut W, animal: &str) -> io::Result<()> {
        write_details(out, self.sightings_of(animal))
    }

    /// Write the details of every sighting of `animal` in `area`.
    pub fn write_sightings_in_area<W: Write>(
        &self,
        out: &mut W,
        animal: &str,
        area: u32,
    ) -> io::Result<()> {
        write_details(out, self.sightings_in_area(animal, area))
    }

    pub fn write_sightings_in_period<W: Write>(&self, out: &mut W, period: u32) -> io::Result<()> {
        write_details(out, self.sightings_in_period(period))
    }

    pub fn write_sightings_of_in_period<W: Write>(
        &self,
        out: &mut W,
        animal: &str,
        period: u32,
    ) -> io::Result<()> {
        write_details(out, self.sightings_of_in_period(animal, period))
    }

    pub fn write_sightings_by<W: Write>(&self, out: &mut W, spotter: u32) -> io::Result<()> {
        write_details(out, self.sightings_by(spotter))
    }

    /// Write `"{animal} count: {total}"`.
    pub fn write_count<W: Write>(&self, out: &mut W, animal: &str) -> io::Result<()> {
        writeln!(out, "{}", format_count_line(animal, self.count_of(animal)))
    }

    /// Write `"{animal} is endangered."` for each endangered animal.
    pub fn write_endangered<W: Write>(&self, out: &mut W, threshold: i64) -> io::Result<()> {
        for name in self.endangered(threshold) {
            writeln!(out, "{}", format_endangered_line(name))?;
        }
        Ok(())
    }

    pub fn print_all(&self) -> io::Result<()> {
        self.write_all(&mut io::stdout().lock())
    }

    pub fn print_sightings_of(&self, animal: &str) -> io::Result<()> {
        self.write_sightings_of(&mut io::stdout().lock(), animal)
    }

    pub fn print_sightings_in_area(&self, animal: &str, area: u32) -> io::Result<()> {
        self.write_sightings_in_area(&mut io::stdout().lock(), animal, area)
    }

    pub fn print_sightings_in_period(&self, period: u32) -> io::Result<()> {
        self.write_sightings_in_period(&mut io::stdout().lock(), period)
    }

    pub fn print_sightings_of_in_period(&self, animal: &str, period: u32) -> io::Result<()> {
        self.write_sightings_of_in_period(&mut io::stdout().lock(), animal, period)
    }

    pub fn print_sightings_by(&self, spotter: u32) -> io::Result<()> {
        self.write_sightings_by(&mut io::stdout().lock(), spotter)
    }

    pub fn print_count(&self, animal: &str) -> io::Result<()> {
        self.write_count(&mut io::stdout().lock(), animal)
    }

    pub fn print_endangered(&self, threshold: i64) -> io::Result<()> {
        self.write_endangered(&mut io::stdout().lock(), threshold)
    }

    // ── Private ───────────────────────────────────────────────────────────────

    fn filter(&self, pred: impl Fn(&Sighting) -> bool) -> Vec<&Sighting> {
        self.sightings.iter().filter(|s| pred(*s)).collect()
    }
}

impl Extend<Sighting> for SightingStore {
    fn extend<I: IntoIterator<Item = Sighting>>(&mut self, iter: I) {
        self.sightings.extend(iter);
    }
}

impl FromIterator<Sighting> for SightingStore {
    fn from_iter<I: IntoIterator<Item = Sighting>>(iter: I) -> Self {
        Self::from_sightings(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a SightingStore {
    type Item = &'a Sighting;
    type IntoIter = std::slice::Iter<'a, Sighting>;

    fn into_iter(self) -> Self::IntoIter {
        self.sightings.iter()
    }
}

fn write_details<'a, W, I>(out: &mut W, sightings: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Sighting>,
{
    for sighting in sightings {
        writeln!(out, "{}", sighting.details())?;
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
