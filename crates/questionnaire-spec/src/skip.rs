use crate::error::SpecError;
use crate::spec::question::{Question, SkipAction};

/// Resolve the branching action bound to `value` on `question`.
///
/// Questions without skip logic always fall through to [`SkipAction::Next`].
/// A value outside the declared choice set is rejected with
/// [`SpecError::InvalidChoice`] rather than silently routed forward.
///
/// Skip logic only applies to single-value fields; resolving a checkbox
/// group or multiple select is a caller error.
///
/// Pure and side-effect free.
pub fn resolve(question: &Question, value: &str) -> Result<SkipAction, SpecError> {
    if question.field_type.is_multi_value() {
        return Err(SpecError::SkipLogicOnMultiValue {
            question: question.clean_name.clone(),
        });
    }
    if question.skip_logic.is_empty() {
        return Ok(SkipAction::Next);
    }

    let index = question
        .choice_index(value)
        .ok_or_else(|| SpecError::InvalidChoice {
            question: question.clean_name.clone(),
            value: value.to_string(),
        })?;

    // Rules align positionally with the choice list; a choice without a
    // rule falls through.
    Ok(question
        .skip_logic
        .get(index)
        .map(|rule| rule.action.clone())
        .unwrap_or(SkipAction::Next))
}
