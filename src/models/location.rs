//! Geocoded location model

use serde::{Deserialize, Serialize};

/// Result of a postcode lookup
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeocodeResult {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Human-readable label ("PL7 1UH, South Hams, South West, England")
    pub label: String,
}

impl GeocodeResult {
    /// Create a new geocode result
    #[must_use]
    pub fn new(latitude: f64, longitude: f64, label: String) -> Self {
        Self {
            latitude,
            longitude,
            label,
        }
    }

    /// Build the label from the address parts, skipping empty ones
    #[must_use]
    pub fn label_from_parts(parts: &[Option<&str>]) -> String {
        parts
            .iter()
            .flatten()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_skips_missing_parts() {
        let label = GeocodeResult::label_from_parts(&[
            Some("PL7 1UH"),
            None,
            Some(""),
            Some("England"),
        ]);
        assert_eq!(label, "PL7 1UH, England");
    }
}
