//! Per-animal totals over a list of sightings.

use std::collections::{BTreeSet, HashMap};

use sighting_core::Sighting;

// ── AnimalTotals ──────────────────────────────────────────────────────────────

/// Everything recorded about one animal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimalTotals {
    pub animal: String,
    /// Sum of counts over all of the animal's sightings.
    pub total_count: i64,
    /// Number of sightings (rows), including zero-count ones.
    pub sightings: usize,
    /// Distinct spotter IDs, ascending.
    pub spotters: Vec<u32>,
    /// Distinct area IDs, ascending.
    pub areas: Vec<u32>,
}

/// Running state while folding one animal's sightings.
#[derive(Default)]
struct Accumulator {
    total_count: i64,
    sightings: usize,
    spotters: BTreeSet<u32>,
    areas: BTreeSet<u32>,
}

impl Accumulator {
    fn add(&mut self, sighting: &Sighting) {
        self.total_count = self.total_count.saturating_add(sighting.count());
        self.sightings += 1;
        self.spotters.insert(sighting.spotter());
        self.areas.insert(sighting.area());
    }

    fn finish(self, animal: &str) -> AnimalTotals {
        AnimalTotals {
            animal: animal.to_string(),
            total_count: self.total_count,
            sightings: self.sightings,
            spotters: self.spotters.into_iter().collect(),
            areas: self.areas.into_iter().collect(),
        }
    }
}

// ── SightingAggregator ────────────────────────────────────────────────────────

/// Stateless helper that groups sightings by animal.
pub struct SightingAggregator;

impl SightingAggregator {
    /// One [`AnimalTotals`] per distinct animal, in order of first
    /// appearance.
    pub fn by_animal(sightings: &[Sighting]) -> Vec<AnimalTotals> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Accumulator> = HashMap::new();

        for sighting in sightings {
            let acc = groups.entry(sighting.animal()).or_insert_with(|| {
                order.push(sighting.animal());
                Accumulator::default()
            });
            acc.add(sighting);
        }

        order
            .into_iter()
            .filter_map(|animal| groups.remove(animal).map(|acc| acc.finish(animal)))
            .collect()
    }

    /// Sum of all animals' counts, saturating at the `i64` bounds.
    pub fn calculate_total(totals: &[AnimalTotals]) -> i64 {
        totals
            .iter()
            .fold(0i64, |total, t| total.saturating_add(t.total_count))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
