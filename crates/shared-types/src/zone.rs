//! Planning zone classification
//!
//! A zone arrives from the planning scheme as a single label such as
//! `"RU - Rural Zone"`. It is kept as code + description and tagged with a
//! coarse category so rules never parse the label themselves.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Zone used whenever the planning scheme lookup yields nothing
pub const DEFAULT_ZONE_LABEL: &str = "LDR - Low Density Residential";

/// Case-sensitive marker that identifies rural zones in a label
const RURAL_MARKER: &str = "RU";

lazy_static! {
    static ref RESIDENTIAL_PATTERN: Regex =
        Regex::new(r"(?i)residential|^\s*(LDR|LMR|MDR|HDR|CR|TR)\b").unwrap();
    static ref COMMERCIAL_PATTERN: Regex =
        Regex::new(r"(?i)commercial|centre|center|mixed use|^\s*(MU|PC|DC|NC|SC)\b").unwrap();
    static ref INDUSTRIAL_PATTERN: Regex =
        Regex::new(r"(?i)industr|^\s*(LII|MI|HI|SI)\b").unwrap();
}

/// Coarse zone grouping used by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneCategory {
    Rural,
    Residential,
    Commercial,
    Industrial,
    Other,
}

impl ZoneCategory {
    /// Categorize a full zone label
    ///
    /// Rural detection is a plain substring match on `RU`; the remaining
    /// categories are keyword/code patterns.
    pub fn classify(label: &str) -> Self {
        if label.contains(RURAL_MARKER) {
            ZoneCategory::Rural
        } else if RESIDENTIAL_PATTERN.is_match(label) {
            ZoneCategory::Residential
        } else if INDUSTRIAL_PATTERN.is_match(label) {
            ZoneCategory::Industrial
        } else if COMMERCIAL_PATTERN.is_match(label) {
            ZoneCategory::Commercial
        } else {
            ZoneCategory::Other
        }
    }
}

/// A property's planning zone
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Zone {
    code: String,
    description: String,
    category: ZoneCategory,
}

impl Zone {
    /// Build a zone from a `"CODE - Description"` label
    ///
    /// Returns `None` for blank labels. Labels without the `" - "` separator
    /// are kept whole as the description.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        let (code, description) = match label.split_once(" - ") {
            Some((code, description)) => (code.trim(), description.trim()),
            None => ("", label),
        };

        Some(Self {
            code: code.to_string(),
            description: description.to_string(),
            category: ZoneCategory::classify(label),
        })
    }

    /// Build a zone from the separate code/description attributes the
    /// planning scheme service returns
    pub fn from_parts(code: &str, description: &str) -> Option<Self> {
        let (code, description) = (code.trim(), description.trim());
        match (code.is_empty(), description.is_empty()) {
            (true, true) => None,
            (false, true) => Self::parse(code),
            (true, false) => Self::parse(description),
            (false, false) => Self::parse(&format!("{} - {}", code, description)),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> ZoneCategory {
        self.category
    }

    pub fn is_rural(&self) -> bool {
        self.category == ZoneCategory::Rural
    }

    /// Full label as shown to users
    pub fn label(&self) -> String {
        match (self.code.is_empty(), self.description.is_empty()) {
            (true, _) => self.description.clone(),
            (false, true) => self.code.clone(),
            (false, false) => format!("{} - {}", self.code, self.description),
        }
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self {
            code: "LDR".to_string(),
            description: "Low Density Residential".to_string(),
            category: ZoneCategory::Residential,
        }
    }
}

impl From<String> for Zone {
    fn from(label: String) -> Self {
        Zone::parse(&label).unwrap_or_default()
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.label()
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}
