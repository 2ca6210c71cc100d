//! Data layer for the animal monitor.
//!
//! Loads sighting records from CSV files, keeps them in an ordered in-memory
//! store, and answers count, filter and endangered-species reports over it.

pub mod aggregator;
pub mod reader;
pub mod store;

pub use reader::{CsvSightingReader, SightingLoader};
pub use sighting_core as core;
pub use store::SightingStore;
