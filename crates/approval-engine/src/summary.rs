//! Narrative recommendation shown under the requirement list

use shared_types::{RequirementSet, StructureType};

/// Turn the verdicts into a single recommendation sentence
pub fn summarize(structure: StructureType, requirements: &RequirementSet) -> String {
    let phrase = structure.phrase();
    if requirements.any_required() {
        format!(
            "Based on your property's zoning and overlays, you need to apply for approval for your {}. \
             Contact your local council for further details.",
            phrase
        )
    } else {
        format!(
            "Good news! Based on the information provided, your {} may not require council approval. \
             However, we recommend confirming with your local council before proceeding.",
            phrase
        )
    }
}
