use std::io::{self, Write};

use sighting_core::formatting::{format_id_list, format_total, percentage};
use sighting_core::settings::Command;
use sighting_data::aggregator::SightingAggregator;
use sighting_data::SightingStore;

/// Run one command against the store, writing its report to `out`.
pub fn run<W: Write>(store: &mut SightingStore, command: &Command, out: &mut W) -> io::Result<()> {
    match command {
        Command::List => store.write_all(out),
        Command::Animal { animal } => store.write_sightings_of(out, animal),
        Command::Period { period } => store.write_sightings_in_period(out, *period),
        Command::AnimalPeriod { animal, period } => {
            store.write_sightings_of_in_period(out, animal, *period)
        }
        Command::Spotter { spotter } => store.write_sightings_by(out, *spotter),
        Command::Count { animal } => store.write_count(out, animal),
        Command::Endangered { threshold } => store.write_endangered(out, threshold.unwrap_or(0)),
        Command::Purge => {
            store.remove_zero_counts();
            store.write_all(out)
        }
        Command::Area { animal, area } => store.write_sightings_in_area(out, animal, *area),
        Command::Summary => write_summary(store, out),
    }
}

/// Per-animal totals followed by a grand total.
fn write_summary<W: Write>(store: &SightingStore, out: &mut W) -> io::Result<()> {
    let totals = SightingAggregator::by_animal(store.as_slice());
    let grand_total = SightingAggregator::calculate_total(&totals);

    for t in &totals {
        writeln!(
            out,
            "{}: {} across {} sightings ({:.1}%), spotters [{}], areas [{}]",
            t.animal,
            format_total(t.total_count),
            t.sightings,
            percentage(t.total_count as f64, grand_total as f64, 1),
            format_id_list(&t.spotters),
            format_id_list(&t.areas),
        )?;
    }
    writeln!(out, "Total: {}", format_total(grand_total))
}
