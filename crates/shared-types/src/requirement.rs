//! Approval requirement verdicts

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The five approval categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequirementKind {
    #[serde(rename = "Development Application")]
    DevelopmentApplication,
    #[serde(rename = "Building Approval")]
    BuildingApproval,
    #[serde(rename = "Plumbing Approval")]
    PlumbingApproval,
    #[serde(rename = "Engineering Certificate")]
    EngineeringCertificate,
    #[serde(rename = "Overlay Assessment")]
    OverlayAssessment,
}

impl RequirementKind {
    pub const ALL: [RequirementKind; 5] = [
        RequirementKind::DevelopmentApplication,
        RequirementKind::BuildingApproval,
        RequirementKind::PlumbingApproval,
        RequirementKind::EngineeringCertificate,
        RequirementKind::OverlayAssessment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RequirementKind::DevelopmentApplication => "Development Application",
            RequirementKind::BuildingApproval => "Building Approval",
            RequirementKind::PlumbingApproval => "Plumbing Approval",
            RequirementKind::EngineeringCertificate => "Engineering Certificate",
            RequirementKind::OverlayAssessment => "Overlay Assessment",
        }
    }
}

impl std::fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether one approval is needed, and why
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequirementVerdict {
    pub name: RequirementKind,
    pub required: bool,
    /// Absent notes serialize as `null`
    #[serde(default)]
    pub note: Option<String>,
}

impl RequirementVerdict {
    pub fn not_required(name: RequirementKind) -> Self {
        Self {
            name,
            required: false,
            note: None,
        }
    }

    pub fn required(name: RequirementKind, note: impl Into<String>) -> Self {
        Self {
            name,
            required: true,
            note: Some(note.into()),
        }
    }
}

/// Rejected verdict list on deserialization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementSetError {
    #[error("expected {expected} requirements, found {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("requirement at position {position} should be '{expected}', found '{found}'")]
    OutOfOrder {
        position: usize,
        expected: RequirementKind,
        found: RequirementKind,
    },
}

/// Exactly five verdicts in fixed order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<RequirementVerdict>", into = "Vec<RequirementVerdict>")]
pub struct RequirementSet {
    verdicts: [RequirementVerdict; 5],
}

impl RequirementSet {
    /// Assemble a set from one verdict per category
    pub fn new(
        development: RequirementVerdict,
        building: RequirementVerdict,
        plumbing: RequirementVerdict,
        engineering: RequirementVerdict,
        overlay: RequirementVerdict,
    ) -> Result<Self, RequirementSetError> {
        Self::try_from(vec![development, building, plumbing, engineering, overlay])
    }

    /// All five categories not required
    pub fn none_required() -> Self {
        Self {
            verdicts: RequirementKind::ALL.map(RequirementVerdict::not_required),
        }
    }

    /// Store a verdict in its category's slot
    pub fn record(&mut self, verdict: RequirementVerdict) {
        let slot = verdict.name as usize;
        self.verdicts[slot] = verdict;
    }

    pub fn get(&self, kind: RequirementKind) -> &RequirementVerdict {
        &self.verdicts[kind as usize]
    }

    pub fn is_required(&self, kind: RequirementKind) -> bool {
        self.get(kind).required
    }

    pub fn any_required(&self) -> bool {
        self.verdicts.iter().any(|v| v.required)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequirementVerdict> {
        self.verdicts.iter()
    }
}

impl TryFrom<Vec<RequirementVerdict>> for RequirementSet {
    type Error = RequirementSetError;

    fn try_from(verdicts: Vec<RequirementVerdict>) -> Result<Self, Self::Error> {
        let found = verdicts.len();
        let verdicts: [RequirementVerdict; 5] =
            verdicts
                .try_into()
                .map_err(|_| RequirementSetError::WrongLength {
                    expected: RequirementKind::ALL.len(),
                    found,
                })?;

        for (position, (verdict, expected)) in verdicts.iter().zip(RequirementKind::ALL).enumerate()
        {
            if verdict.name != expected {
                return Err(RequirementSetError::OutOfOrder {
                    position,
                    expected,
                    found: verdict.name,
                });
            }
        }

        Ok(Self { verdicts })
    }
}

impl From<RequirementSet> for Vec<RequirementVerdict> {
    fn from(set: RequirementSet) -> Self {
        set.verdicts.into()
    }
}
