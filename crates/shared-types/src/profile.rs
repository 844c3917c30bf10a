//! Property lookups and the outbound approval report

use serde::{Deserialize, Serialize};

use crate::overlay::OverlaySet;
use crate::requirement::RequirementSet;
use crate::zone::Zone;

/// Whether a value came from a real lookup or a documented fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Matched,
    Defaulted,
}

/// A value tagged with its [`Resolution`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T> {
    pub value: T,
    pub resolution: Resolution,
}

impl<T> Resolved<T> {
    pub fn matched(value: T) -> Self {
        Self {
            value,
            resolution: Resolution::Matched,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            resolution: Resolution::Defaulted,
        }
    }

    pub fn is_default(&self) -> bool {
        self.resolution == Resolution::Defaulted
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolved<U> {
        Resolved {
            value: f(self.value),
            resolution: self.resolution,
        }
    }
}

/// What the location resolver knows about a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyProfile {
    pub zone: Resolved<Zone>,
    pub overlays: OverlaySet,
    /// Local government area name, e.g. "BRISBANE CITY"
    pub jurisdiction_id: Option<String>,
}

impl PropertyProfile {
    /// Profile used when the address cannot be resolved at all
    pub fn fallback() -> Self {
        Self {
            zone: Resolved::defaulted(Zone::default()),
            overlays: OverlaySet::none(),
            jurisdiction_id: None,
        }
    }
}

/// Result returned to callers and handed to document export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalReport {
    pub zone: Zone,
    pub overlays: OverlaySet,
    pub requirements: RequirementSet,
    pub next_steps: String,
}
