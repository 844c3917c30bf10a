//! Building Approval

use shared_types::{RequirementKind, RequirementVerdict, StructureType};

use crate::EvaluationInput;

/// Minor structures over the council size limit, and every habitable
/// structure, need building approval
pub fn check_building_approval(input: &EvaluationInput) -> RequirementVerdict {
    let kind = RequirementKind::BuildingApproval;
    let size_limit = input.jurisdiction_limits.size_limit;

    if input.structure_type.is_minor() && input.assumed_size > size_limit {
        RequirementVerdict::required(
            kind,
            format!("Required for structures over {} square meters.", size_limit),
        )
    } else if input.structure_type == StructureType::GrannyFlat {
        RequirementVerdict::required(kind, "All habitable structures require building approval.")
    } else {
        RequirementVerdict::not_required(kind)
    }
}
