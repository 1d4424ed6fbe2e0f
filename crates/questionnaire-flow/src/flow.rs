use tracing::error;

use questionnaire_spec::{
    AnswerMap, Question, QuestionnaireSpec, ValidationError, validate_answers,
};

use crate::error::FlowError;
use crate::paginator::{StepPage, StepPaginator, parse_page_number};
use crate::store::{AnswerStore, SessionKey, SubmissionStore};
use crate::submission::{SubmissionRecord, finalize};

/// HTTP-style method of one request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

/// One request/response cycle's input, as handed over by the platform's
/// routing layer.
#[derive(Debug, Clone)]
pub struct StepRequest {
    pub method: RequestMethod,
    /// Raw `p` query parameter. Absent or non-numeric selects page 1. On
    /// POST it tags the step being submitted: one past the page that was
    /// displayed.
    pub page_param: Option<String>,
    /// Field data submitted with a POST; empty on GET.
    pub data: AnswerMap,
    /// Respondent identity; `None` for anonymous visitors.
    pub respondent: Option<String>,
    pub session_token: String,
}

impl StepRequest {
    pub fn get(session_token: &str, page_param: Option<&str>) -> Self {
        Self {
            method: RequestMethod::Get,
            page_param: page_param.map(str::to_string),
            data: AnswerMap::new(),
            respondent: None,
            session_token: session_token.to_string(),
        }
    }

    pub fn post(session_token: &str, page_param: &str, data: AnswerMap) -> Self {
        Self {
            method: RequestMethod::Post,
            page_param: Some(page_param.to_string()),
            data,
            respondent: None,
            session_token: session_token.to_string(),
        }
    }

    pub fn with_respondent(mut self, respondent: &str) -> Self {
        self.respondent = Some(respondent.to_string());
        self
    }
}

/// Where the state machine stands after handling one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    /// Rendering or collecting the given page.
    AwaitingStep(usize),
    /// A resubmission failed validation; the same page re-renders.
    RevalidatingPrevious(usize),
    /// Every page was satisfied but the full-record re-check failed.
    Finalizing,
    /// Submission persisted, session cleared.
    Complete,
    /// The multiple-submission policy prevents further interaction.
    Blocked,
}

/// Re-render instruction for one page. Presentation belongs to the caller.
#[derive(Debug, Clone)]
pub struct RenderPage {
    pub number: usize,
    pub questions: Vec<Question>,
    pub errors: Vec<ValidationError>,
    /// No further pages remain after this one.
    pub is_last: bool,
    pub submit_label: String,
}

/// What the caller should present next.
#[derive(Debug, Clone)]
pub enum FlowOutcome {
    Render(RenderPage),
    /// Submission persisted; show the thank-you view.
    ThankYou { submission: SubmissionRecord },
    /// Policy blocked the request; show the already-submitted view.
    AlreadySubmitted,
}

/// Orchestrates one request/response cycle of a multi-step questionnaire:
/// loads prior answers, resolves the submitted step, validates, merges,
/// and advances or finalizes.
///
/// Each transition is a function of the request and the two stores; no
/// state lives on the controller itself.
pub struct StepFlowController<'a> {
    spec: &'a QuestionnaireSpec,
    answers: &'a mut dyn AnswerStore,
    submissions: &'a mut dyn SubmissionStore,
}

impl<'a> StepFlowController<'a> {
    pub fn new(
        spec: &'a QuestionnaireSpec,
        answers: &'a mut dyn AnswerStore,
        submissions: &'a mut dyn SubmissionStore,
    ) -> Self {
        Self {
            spec,
            answers,
            submissions,
        }
    }

    pub fn handle(&mut self, request: &StepRequest) -> Result<(FlowState, FlowOutcome), FlowError> {
        // Policy guard runs before any session access.
        if !self.spec.allow_multiple_submissions
            && self
                .submissions
                .has_submission(&self.spec.id, request.respondent.as_deref())
        {
            return Ok((FlowState::Blocked, FlowOutcome::AlreadySubmitted));
        }

        match self.handle_unblocked(request) {
            Ok(transition) => Ok(transition),
            Err(err) => {
                // Configuration faults hitting a live session cannot be
                // recovered for this request; the caller falls back to a
                // generic failure page.
                error!(questionnaire = %self.spec.id, %err, "request failed");
                Err(err)
            }
        }
    }

    fn handle_unblocked(
        &mut self,
        request: &StepRequest,
    ) -> Result<(FlowState, FlowOutcome), FlowError> {
        let key = SessionKey::new(&self.spec.id, &request.session_token);
        let step_number = parse_page_number(request.page_param.as_deref());

        if request.method == RequestMethod::Get {
            // Reads never mutate the session. Step 1 always starts from a
            // blank slate, so an abandoned run cannot leak forward.
            let stored = if step_number == 1 {
                AnswerMap::new()
            } else {
                self.answers.get(&key).unwrap_or_default()
            };
            let paginator = StepPaginator::new(self.spec, &stored);
            let page = paginator.page(step_number)?;
            let number = page.number;
            return Ok((
                FlowState::AwaitingStep(number),
                self.render(page, Vec::new()),
            ));
        }

        let stored = self.answers.get(&key).unwrap_or_default();

        // The submitted step arrives tagged one past the displayed page.
        // Resolving which page was actually posted needs the submitted
        // values too, since their skip logic shapes the pagination.
        let mut working = stored.clone();
        working.extend(request.data.clone());
        let submitted_number = self.resolve_submitted_page(&working, step_number)?;

        // A submission targeting the first page restarts the session.
        let base = if submitted_number == 1 {
            AnswerMap::new()
        } else {
            stored
        };
        let mut merged = base;
        merged.extend(request.data.clone());

        let paginator = StepPaginator::new(self.spec, &merged);
        let submitted = paginator.page(submitted_number)?;

        let errors = validate_answers(&submitted.questions, &request.data);
        if !errors.is_empty() {
            // Session untouched; the respondent fixes the same page.
            let number = submitted.number;
            return Ok((
                FlowState::RevalidatingPrevious(number),
                self.render(submitted, errors),
            ));
        }

        self.answers.put(&key, merged.clone());

        if submitted.has_next {
            let next = paginator.advance_from(&submitted)?;
            let number = next.number;
            return Ok((
                FlowState::AwaitingStep(number),
                self.render(next, Vec::new()),
            ));
        }

        // Finalizing: re-validate the complete record over every question
        // the skip-resolved flow kept, then persist and clear in one block
        // to keep the double-submit window minimal.
        let included = paginator.included_questions()?;
        let mut record_errors = validate_answers(&included, &merged);
        if request.respondent.is_none() && !self.spec.allow_anonymous_submissions {
            record_errors.push(ValidationError::record(
                "this questionnaire does not accept anonymous submissions",
                "anonymous_forbidden",
            ));
        }
        if !record_errors.is_empty() {
            return Ok((FlowState::Finalizing, self.render(submitted, record_errors)));
        }

        let record = finalize(self.spec, merged, request.respondent.clone());
        self.submissions.append(record.clone());
        self.answers.delete(&key);
        Ok((
            FlowState::Complete,
            FlowOutcome::ThankYou { submission: record },
        ))
    }

    /// Which page does a POST tagged with `step_number` actually submit?
    ///
    /// The ordinary case is `step_number - 1`. A tag past the end of a
    /// sequence that has already terminated means the respondent reposted
    /// the terminal page; a tag of 1 posts the first page while being
    /// routed toward the second.
    fn resolve_submitted_page(
        &self,
        working: &AnswerMap,
        step_number: usize,
    ) -> Result<usize, FlowError> {
        let paginator = StepPaginator::new(self.spec, working);
        let lookup = paginator.page(step_number)?;
        if lookup.is_terminal {
            return Ok(lookup.number);
        }
        Ok(lookup.previous_number().unwrap_or(lookup.number))
    }

    fn render(&self, page: StepPage, errors: Vec<ValidationError>) -> FlowOutcome {
        FlowOutcome::Render(RenderPage {
            number: page.number,
            is_last: !page.has_next,
            questions: page.questions,
            errors,
            submit_label: self.spec.submit_button_text.clone(),
        })
    }
}
