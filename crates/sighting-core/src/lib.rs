//! Shared types for the animal monitor: the sighting record, the error type,
//! command-line settings and report line formatting.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{MonitorError, Result};
pub use models::Sighting;
