//! Proposed backyard structure types
//!
//! The four snake_case tokens are part of the wire contract and must not be
//! renamed or reordered.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of structure the property owner wants to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureType {
    Shed,
    Patio,
    Carport,
    GrannyFlat,
}

/// Raised when a caller supplies a token outside the fixed vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown structure type '{0}'. Supported: shed, patio, carport, granny_flat")]
pub struct ParseStructureTypeError(pub String);

impl StructureType {
    /// All structure types in wire order
    pub const ALL: [StructureType; 4] = [
        StructureType::Shed,
        StructureType::Patio,
        StructureType::Carport,
        StructureType::GrannyFlat,
    ];

    /// Wire token (e.g. "granny_flat")
    pub fn as_str(&self) -> &'static str {
        match self {
            StructureType::Shed => "shed",
            StructureType::Patio => "patio",
            StructureType::Carport => "carport",
            StructureType::GrannyFlat => "granny_flat",
        }
    }

    /// Title-case label used on exported documents
    pub fn label(&self) -> &'static str {
        match self {
            StructureType::Shed => "Shed",
            StructureType::Patio => "Patio",
            StructureType::Carport => "Carport",
            StructureType::GrannyFlat => "Granny Flat",
        }
    }

    /// Lower-case phrase for narrative text ("granny flat")
    pub fn phrase(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Non-habitable outbuildings that are assessed on footprint alone
    pub fn is_minor(&self) -> bool {
        matches!(
            self,
            StructureType::Shed | StructureType::Patio | StructureType::Carport
        )
    }

    /// Footprint (m²) assumed when the caller gives none
    pub fn nominal_size(&self) -> f64 {
        match self {
            StructureType::Shed => 100.0,
            _ => 50.0,
        }
    }
}

impl std::fmt::Display for StructureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StructureType {
    type Err = ParseStructureTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shed" => Ok(StructureType::Shed),
            "patio" => Ok(StructureType::Patio),
            "carport" => Ok(StructureType::Carport),
            "granny_flat" => Ok(StructureType::GrannyFlat),
            _ => Err(ParseStructureTypeError(s.to_string())),
        }
    }
}
