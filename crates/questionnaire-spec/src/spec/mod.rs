pub mod question;
pub mod questionnaire;

pub use question::{FieldType, Question, SkipAction, SkipRule};
pub use questionnaire::{QuestionnaireKind, QuestionnaireSpec};
