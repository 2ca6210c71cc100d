use serde::{Deserialize, Serialize};

/// One reported observation of an animal.
///
/// The display string is built once at construction and the fields are only
/// reachable through accessors, so `details()` always matches the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sighting {
    animal: String,
    spotter: u32,
    count: i64,
    area: u32,
    period: u32,
    details: String,
}

impl Sighting {
    /// Build a sighting and precompute its details line.
    pub fn new(animal: impl Into<String>, spotter: u32, count: i64, area: u32, period: u32) -> Self {
        let animal = animal.into();
        let details = format!(
            "{}, count = {}, area = {}, spotter = {}, period = {}",
            animal, count, area, spotter, period
        );
        Self {
            animal,
            spotter,
            count,
            area,
            period,
            details,
        }
    }

    /// Type of animal, matched exactly and case-sensitively by queries.
    pub fn animal(&self) -> &str {
        &self.animal
    }

    /// ID of the spotter who recorded the sighting.
    pub fn spotter(&self) -> u32 {
        self.spotter
    }

    /// Number of animals seen. Not validated, so it may be zero or negative.
    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn area(&self) -> u32 {
        self.area
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    /// Human-readable one-line description.
    pub fn details(&self) -> &str {
        &self.details
    }
}

/// One raw row of a sightings file, in column order
/// `animal, spotter, count, area, period`.
#[derive(Debug, Clone, Deserialize)]
pub struct SightingRow {
    pub animal: String,
    pub spotter: u32,
    pub count: i64,
    pub area: u32,
    pub period: u32,
}

impl From<SightingRow> for Sighting {
    fn from(row: SightingRow) -> Self {
        Sighting::new(row.animal, row.spotter, row.count, row.area, row.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_format() {
        let s = Sighting::new("Mountain Gorilla", 0, 3, 1, 0);
        assert_eq!(
            s.details(),
            "Mountain Gorilla, count = 3, area = 1, spotter = 0, period = 0"
        );
    }

    #[test]
    fn test_accessors() {
        let s = Sighting::new("fox", 7, 2, 4, 9);
        assert_eq!(s.animal(), "fox");
        assert_eq!(s.spotter(), 7);
        assert_eq!(s.count(), 2);
        assert_eq!(s.area(), 4);
        assert_eq!(s.period(), 9);
    }

    #[test]
    fn test_negative_count_preserved() {
        let s = Sighting::new("owl", 1, -4, 1, 1);
        assert_eq!(s.count(), -4);
        assert!(s.details().contains("count = -4"));
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(Sighting::new("fox", 1, 3, 1, 1), Sighting::new("fox", 1, 3, 1, 1));
        assert_ne!(Sighting::new("fox", 1, 3, 1, 1), Sighting::new("fox", 2, 3, 1, 1));
    }

    #[test]
    fn test_from_row() {
        let row = SightingRow {
            animal: "Elephant".to_string(),
            spotter: 2,
            count: 24,
            area: 2,
            period: 1,
        };
        let s = Sighting::from(row);
        assert_eq!(s, Sighting::new("Elephant", 2, 24, 2, 1));
    }

    #[test]
    fn test_serializes_with_details() {
        let s = Sighting::new("fox", 1, 3, 1, 1);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["animal"], "fox");
        assert_eq!(json["count"], 3);
        assert_eq!(json["details"], s.details());
    }
}
