pub mod overlay;
pub mod profile;
pub mod requirement;
pub mod structure;
pub mod zone;

pub use overlay::{Overlay, OverlayKind, OverlaySet, OverlaySetError};
pub use profile::{ApprovalReport, PropertyProfile, Resolution, Resolved};
pub use requirement::{RequirementKind, RequirementSet, RequirementSetError, RequirementVerdict};
pub use structure::{ParseStructureTypeError, StructureType};
pub use zone::{Zone, ZoneCategory, DEFAULT_ZONE_LABEL};
