//! Property overlays (hazard and heritage designators)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six overlay categories, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayKind {
    #[serde(rename = "Flood Hazard")]
    FloodHazard,
    #[serde(rename = "Bushfire Risk")]
    BushfireRisk,
    #[serde(rename = "Heritage")]
    Heritage,
    #[serde(rename = "Environmental Significance")]
    EnvironmentalSignificance,
    #[serde(rename = "Waterway Corridor")]
    WaterwayCorridor,
    #[serde(rename = "Landslide Hazard")]
    LandslideHazard,
}

impl OverlayKind {
    /// Canonical order; also the wire order of every `OverlaySet`
    pub const ALL: [OverlayKind; 6] = [
        OverlayKind::FloodHazard,
        OverlayKind::BushfireRisk,
        OverlayKind::Heritage,
        OverlayKind::EnvironmentalSignificance,
        OverlayKind::WaterwayCorridor,
        OverlayKind::LandslideHazard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OverlayKind::FloodHazard => "Flood Hazard",
            OverlayKind::BushfireRisk => "Bushfire Risk",
            OverlayKind::Heritage => "Heritage",
            OverlayKind::EnvironmentalSignificance => "Environmental Significance",
            OverlayKind::WaterwayCorridor => "Waterway Corridor",
            OverlayKind::LandslideHazard => "Landslide Hazard",
        }
    }

    /// Natural hazards that call for an engineer's sign-off
    pub fn is_geotechnical_hazard(&self) -> bool {
        matches!(self, OverlayKind::FloodHazard | OverlayKind::LandslideHazard)
    }

    fn position(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for OverlayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One overlay and whether it affects the property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Overlay {
    pub name: OverlayKind,
    pub active: bool,
}

/// Rejected overlay list on deserialization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlaySetError {
    #[error("expected {expected} overlays, found {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("overlay at position {position} should be '{expected}', found '{found}'")]
    OutOfOrder {
        position: usize,
        expected: OverlayKind,
        found: OverlayKind,
    },
}

/// All six overlays for a property, always complete and in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Overlay>", into = "Vec<Overlay>")]
pub struct OverlaySet {
    overlays: [Overlay; 6],
}

impl OverlaySet {
    /// Every overlay inactive
    pub fn none() -> Self {
        Self {
            overlays: OverlayKind::ALL.map(|name| Overlay {
                name,
                active: false,
            }),
        }
    }

    /// Set with exactly the given overlays active
    pub fn with_active(kinds: &[OverlayKind]) -> Self {
        let mut set = Self::none();
        for kind in kinds {
            set.set_active(*kind, true);
        }
        set
    }

    pub fn set_active(&mut self, kind: OverlayKind, active: bool) {
        self.overlays[kind.position()].active = active;
    }

    pub fn is_active(&self, kind: OverlayKind) -> bool {
        self.overlays[kind.position()].active
    }

    /// Active overlays in canonical order
    pub fn active(&self) -> impl Iterator<Item = OverlayKind> + '_ {
        self.overlays.iter().filter(|o| o.active).map(|o| o.name)
    }

    pub fn any_active(&self) -> bool {
        self.overlays.iter().any(|o| o.active)
    }

    /// Active overlay names joined by ", " (empty when none are active)
    pub fn active_names(&self) -> String {
        self.active()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.iter()
    }
}

impl Default for OverlaySet {
    fn default() -> Self {
        Self::none()
    }
}

impl TryFrom<Vec<Overlay>> for OverlaySet {
    type Error = OverlaySetError;

    fn try_from(overlays: Vec<Overlay>) -> Result<Self, Self::Error> {
        if overlays.len() != OverlayKind::ALL.len() {
            return Err(OverlaySetError::WrongLength {
                expected: OverlayKind::ALL.len(),
                found: overlays.len(),
            });
        }

        let mut set = Self::none();
        for (position, (overlay, expected)) in overlays.iter().zip(OverlayKind::ALL).enumerate() {
            if overlay.name != expected {
                return Err(OverlaySetError::OutOfOrder {
                    position,
                    expected,
                    found: overlay.name,
                });
            }
            set.set_active(overlay.name, overlay.active);
        }
        Ok(set)
    }
}

impl From<OverlaySet> for Vec<Overlay> {
    fn from(set: OverlaySet) -> Self {
        set.overlays.to_vec()
    }
}
