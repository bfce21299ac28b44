//! Monitored property configuration

use serde::{Deserialize, Serialize};

/// A property whose gusts are monitored. Read-only configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PropertyConfig {
    pub name: String,
    pub postcode: String,
    /// Preferred forecast location label, overriding the provider's site name
    #[serde(default)]
    pub forecast_location: Option<String>,
}

impl PropertyConfig {
    #[must_use]
    pub fn new(name: &str, postcode: &str, forecast_location: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            postcode: postcode.to_string(),
            forecast_location: forecast_location.map(str::to_string),
        }
    }

    /// Properties shipped with the default configuration
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Saltram House", "PL7 1UH", Some("Cornwood")),
            Self::new("Cotehele", "PL12 6TA", Some("Liskeard")),
        ]
    }

    /// Whether a user query names this property, by name or postcode.
    /// Postcodes compare without spaces, both sides case-insensitive.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query)
            || normalize_postcode(&self.postcode) == normalize_postcode(query)
    }

    /// Find the property a query refers to
    #[must_use]
    pub fn find<'a>(properties: &'a [Self], query: &str) -> Option<&'a Self> {
        properties.iter().find(|property| property.matches(query))
    }
}

fn normalize_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}
