use roster_core::{
    needs_dimension_check, validate_draft, DimensionCheck, Position, SubmissionDraft,
    ValidationResult, ValidationRules,
};
use roster_logging::roster_debug;

use crate::photo::read_photo_dimensions;

/// Full validator run. The field rules are checked first; the photo is only
/// decoded when its size can still change the verdict.
pub async fn validate(
    draft: &SubmissionDraft,
    positions: &[Position],
    rules: &ValidationRules,
) -> ValidationResult {
    let unmeasured = validate_draft(draft, positions, rules, DimensionCheck::Skipped);
    if !needs_dimension_check(&unmeasured, rules) {
        return unmeasured;
    }
    let Some(photo) = draft.photo.as_ref() else {
        return unmeasured;
    };

    let check = match read_photo_dimensions(photo.bytes.clone()).await {
        Ok(dimensions) => {
            roster_debug!("Photo {} measures {}", photo.file_name, dimensions);
            DimensionCheck::Measured(dimensions)
        }
        Err(err) => {
            roster_debug!("Photo {} could not be decoded: {}", photo.file_name, err);
            DimensionCheck::Undecodable
        }
    };
    validate_draft(draft, positions, rules, check)
}
