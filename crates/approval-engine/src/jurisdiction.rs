//! Jurisdiction rule table
//!
//! Each local government area (LGA) may set its own size, height and setback
//! limits per structure type. Lookups never fail:
//! - Unknown or absent LGA: global defaults for the structure type
//! - Known LGA without an entry for the structure: global defaults
//!
//! LGA identifiers are matched case-insensitively ("Brisbane City" and
//! "BRISBANE CITY" are the same council).

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_types::{Resolved, StructureType};
use thiserror::Error;

/// Size / height / setback limits for one structure type in one council
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionLimits {
    /// Maximum footprint (m²) before building approval is needed
    pub size_limit: f64,
    /// Maximum height (m)
    pub height_limit: f64,
    /// Minimum boundary setback (m)
    pub setback: f64,
}

impl JurisdictionLimits {
    pub const fn new(size_limit: f64, height_limit: f64, setback: f64) -> Self {
        Self {
            size_limit,
            height_limit,
            setback,
        }
    }

    /// Global defaults used when no council-specific entry applies
    pub fn global_default(structure: StructureType) -> Self {
        match structure {
            StructureType::Shed => Self::new(10.0, 2.4, 1.5),
            StructureType::Patio => Self::new(10.0, 2.7, 1.5),
            StructureType::Carport => Self::new(20.0, 2.7, 1.5),
            StructureType::GrannyFlat => Self::new(70.0, 4.5, 3.0),
        }
    }

    fn validate(&self, context: &str) -> Result<(), RuleTableError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(self.size_limit) {
            return Err(RuleTableError::InvalidLimit {
                context: context.to_string(),
                field: "size_limit",
                value: self.size_limit,
            });
        }
        if !positive(self.height_limit) {
            return Err(RuleTableError::InvalidLimit {
                context: context.to_string(),
                field: "height_limit",
                value: self.height_limit,
            });
        }
        if !(self.setback.is_finite() && self.setback >= 0.0) {
            return Err(RuleTableError::InvalidLimit {
                context: context.to_string(),
                field: "setback",
                value: self.setback,
            });
        }
        Ok(())
    }
}

/// Numeric knobs of the rules that are not per-council limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Rural sheds need a development application above `size_limit × this`
    pub rural_shed_multiplier: f64,
    /// Minor structures need an engineering certificate above `size_limit × this`
    pub engineering_multiplier: f64,
    /// Fixed engineering trigger area (m²); overrides the multiplier when set
    pub engineering_fixed_area: Option<f64>,
}

impl Thresholds {
    /// Footprint above which a rural shed needs a development application
    pub fn rural_shed_area(&self, limits: &JurisdictionLimits) -> f64 {
        limits.size_limit * self.rural_shed_multiplier
    }

    /// Footprint above which a minor structure needs an engineering certificate
    pub fn engineering_area(&self, limits: &JurisdictionLimits) -> f64 {
        self.engineering_fixed_area
            .unwrap_or(limits.size_limit * self.engineering_multiplier)
    }

    fn validate(&self) -> Result<(), RuleTableError> {
        let checks = [
            ("rural_shed_multiplier", Some(self.rural_shed_multiplier)),
            ("engineering_multiplier", Some(self.engineering_multiplier)),
            ("engineering_fixed_area", self.engineering_fixed_area),
        ];
        for (field, value) in checks {
            if let Some(value) = value {
                if !(value.is_finite() && value > 0.0) {
                    return Err(RuleTableError::InvalidThreshold { field, value });
                }
            }
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rural_shed_multiplier: 10.0,
            engineering_multiplier: 2.0,
            engineering_fixed_area: None,
        }
    }
}

/// Errors loading a rule table from configuration
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("Invalid {field} for {context}: {value}")]
    InvalidLimit {
        context: String,
        field: &'static str,
        value: f64,
    },

    #[error("Invalid threshold {field}: {value}")]
    InvalidThreshold { field: &'static str, value: f64 },

    #[error("Duplicate jurisdiction '{0}' (identifiers are case-insensitive)")]
    DuplicateJurisdiction(String),

    #[error("Malformed rule file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read rule file: {0}")]
    Io(#[from] std::io::Error),
}

type LimitsByStructure = HashMap<StructureType, JurisdictionLimits>;

/// Per-council limits plus table-wide defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable {
    /// Overrides of the global defaults; missing structures use the built-ins
    #[serde(default)]
    defaults: LimitsByStructure,
    /// Keyed by normalized (upper-case) LGA name
    #[serde(default)]
    jurisdictions: HashMap<String, LimitsByStructure>,
}

/// Built-in Queensland councils (placeholder figures)
const BUILTIN_COUNCILS: &[(&str, [(StructureType, JurisdictionLimits); 4])] = &[
    (
        "BRISBANE CITY",
        [
            (StructureType::Shed, JurisdictionLimits::new(10.0, 2.4, 1.5)),
            (StructureType::Patio, JurisdictionLimits::new(10.0, 2.7, 1.5)),
            (StructureType::Carport, JurisdictionLimits::new(20.0, 2.7, 1.5)),
            (StructureType::GrannyFlat, JurisdictionLimits::new(80.0, 4.5, 3.0)),
        ],
    ),
    (
        "GOLD COAST CITY",
        [
            (StructureType::Shed, JurisdictionLimits::new(10.0, 2.4, 1.5)),
            (StructureType::Patio, JurisdictionLimits::new(10.0, 2.7, 1.5)),
            (StructureType::Carport, JurisdictionLimits::new(20.0, 2.7, 1.5)),
            (StructureType::GrannyFlat, JurisdictionLimits::new(60.0, 4.5, 3.0)),
        ],
    ),
];

fn normalize_id(id: &str) -> String {
    id.trim().to_uppercase()
}

impl RuleTable {
    /// Empty table: every lookup falls back to the global defaults
    pub fn empty() -> Self {
        Self {
            defaults: HashMap::new(),
            jurisdictions: HashMap::new(),
        }
    }

    /// The built-in Queensland council table
    pub fn queensland() -> Self {
        let mut table = Self::empty();
        for (council, entries) in BUILTIN_COUNCILS {
            table
                .jurisdictions
                .insert(council.to_string(), entries.iter().copied().collect());
        }
        table
    }

    /// Add or replace a council's limits for one structure type
    pub fn insert(&mut self, jurisdiction_id: &str, structure: StructureType, limits: JurisdictionLimits) {
        self.jurisdictions
            .entry(normalize_id(jurisdiction_id))
            .or_default()
            .insert(structure, limits);
    }

    /// Register a council with no structure-specific limits
    pub fn insert_jurisdiction(&mut self, jurisdiction_id: &str) {
        self.jurisdictions.entry(normalize_id(jurisdiction_id)).or_default();
    }

    /// Whether the council is known to the table
    pub fn contains(&self, jurisdiction_id: &str) -> bool {
        self.jurisdictions.contains_key(&normalize_id(jurisdiction_id))
    }

    /// Known council identifiers, sorted
    pub fn jurisdictions(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.jurisdictions.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Table-wide default for a structure type
    pub fn default_limits(&self, structure: StructureType) -> JurisdictionLimits {
        self.defaults
            .get(&structure)
            .copied()
            .unwrap_or_else(|| JurisdictionLimits::global_default(structure))
    }

    /// Limits for a council and structure type, falling back to defaults
    pub fn limits_for(
        &self,
        jurisdiction_id: Option<&str>,
        structure: StructureType,
    ) -> JurisdictionLimits {
        self.resolve(jurisdiction_id, structure).into_inner()
    }

    /// Like [`RuleTable::limits_for`], but reports whether a council entry matched
    pub fn resolve(
        &self,
        jurisdiction_id: Option<&str>,
        structure: StructureType,
    ) -> Resolved<JurisdictionLimits> {
        jurisdiction_id
            .and_then(|id| self.jurisdictions.get(&normalize_id(id)))
            .and_then(|limits| limits.get(&structure))
            .map(|limits| Resolved::matched(*limits))
            .unwrap_or_else(|| Resolved::defaulted(self.default_limits(structure)))
    }

    /// Check every configured limit and normalize council identifiers
    fn validated(self) -> Result<Self, RuleTableError> {
        for (structure, limits) in &self.defaults {
            limits.validate(&format!("default {}", structure))?;
        }

        let mut jurisdictions = HashMap::with_capacity(self.jurisdictions.len());
        for (id, entries) in self.jurisdictions {
            let key = normalize_id(&id);
            for (structure, limits) in &entries {
                limits.validate(&format!("{} {}", key, structure))?;
            }
            if jurisdictions.insert(key.clone(), entries).is_some() {
                return Err(RuleTableError::DuplicateJurisdiction(key));
            }
        }

        Ok(Self {
            defaults: self.defaults,
            jurisdictions,
        })
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::queensland()
    }
}

/// A rule table and thresholds, as loaded from a JSON rule file
///
/// ```json
/// {
///   "thresholds": { "engineering_fixed_area": 40 },
///   "defaults": { "shed": { "size_limit": 10, "height_limit": 2.4, "setback": 1.5 } },
///   "jurisdictions": {
///     "BRISBANE CITY": { "granny_flat": { "size_limit": 80, "height_limit": 4.5, "setback": 3 } }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(flatten)]
    pub table: RuleTable,
}

impl RuleConfig {
    pub fn from_json_str(json: &str) -> Result<Self, RuleTableError> {
        let config: RuleConfig = serde_json::from_str(json)?;
        config.thresholds.validate()?;
        Ok(Self {
            thresholds: config.thresholds,
            table: config.table.validated()?,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            table: RuleTable::queensland(),
        }
    }
}
