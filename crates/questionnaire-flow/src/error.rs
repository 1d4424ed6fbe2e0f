use questionnaire_spec::SpecError;
use thiserror::Error;

/// Faults raised while driving a questionnaire flow.
///
/// Everything here is unrecoverable for the current request; per-field
/// validation failures are data on the render outcome, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Non-positive page request.
    #[error("page {0} is out of range")]
    PageOutOfRange(usize),
    /// A configuration fault encountered against live data.
    #[error(transparent)]
    Spec(#[from] SpecError),
    /// Quiz scoring over a list-valued answer is undefined.
    #[error("cannot score list-valued answer for question '{0}'")]
    MultiValueScore(String),
}
