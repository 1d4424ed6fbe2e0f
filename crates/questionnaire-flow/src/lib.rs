#![allow(missing_docs)]

pub mod error;
pub mod flow;
pub mod paginator;
pub mod store;
pub mod submission;

pub use error::FlowError;
pub use flow::{
    FlowOutcome, FlowState, RenderPage, RequestMethod, StepFlowController, StepRequest,
};
pub use paginator::{StepPage, StepPaginator, parse_page_number};
pub use store::{
    AnswerStore, MemoryAnswerStore, MemorySubmissionStore, SessionKey, SubmissionStore,
};
pub use submission::{
    PollResults, QuestionScore, QuizResult, SubmissionRecord, finalize, score_quiz, tally_poll,
};
