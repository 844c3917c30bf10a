//! Development Application (planning approval)

use shared_types::{RequirementKind, RequirementVerdict, StructureType};

use crate::jurisdiction::Thresholds;
use crate::EvaluationInput;

/// Decide whether a development application is likely needed
///
/// First match wins:
/// 1. Granny flats (secondary dwellings)
/// 2. Rural sheds larger than the rural multiple of the council size limit
/// 3. Any active overlay
pub fn check_development_application(
    input: &EvaluationInput,
    thresholds: &Thresholds,
) -> RequirementVerdict {
    let kind = RequirementKind::DevelopmentApplication;

    if input.structure_type == StructureType::GrannyFlat {
        RequirementVerdict::required(
            kind,
            "Secondary dwellings typically require development approval in QLD.",
        )
    } else if input.structure_type == StructureType::Shed
        && input.zone.is_rural()
        && input.assumed_size > thresholds.rural_shed_area(&input.jurisdiction_limits)
    {
        RequirementVerdict::required(
            kind,
            "Large sheds in rural zones may require development approval.",
        )
    } else if input.overlays.any_active() {
        RequirementVerdict::required(
            kind,
            format!("Required due to {} overlays.", input.overlays.active_names()),
        )
    } else {
        RequirementVerdict::not_required(kind)
    }
}
