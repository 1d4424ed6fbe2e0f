use questionnaire_spec::{AnswerMap, Question, QuestionnaireSpec, SkipAction, SpecError, resolve};

use crate::error::FlowError;

/// Parse the `p` request parameter; absent or non-numeric input selects
/// page 1. A parsed `0` is surfaced later as [`FlowError::PageOutOfRange`].
pub fn parse_page_number(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(1)
}

/// One renderable step: a contiguous run of questions with skip-resolved
/// exclusions already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StepPage {
    pub number: usize,
    pub questions: Vec<Question>,
    pub has_previous: bool,
    pub has_next: bool,
    /// True when a past-the-end request was clamped down to this page.
    pub is_terminal: bool,
}

impl StepPage {
    pub fn previous_number(&self) -> Option<usize> {
        (self.number > 1).then(|| self.number - 1)
    }

    pub fn next_number(&self) -> usize {
        self.number + 1
    }
}

/// Outcome of the skip-logic walk over the full question order.
struct ExclusionState {
    excluded: Vec<bool>,
    ended: bool,
}

/// Groups a question set into pages by its page-break flags and applies
/// skip-logic exclusions derived from the accumulated answers.
///
/// A questionnaire that is not multi-step is a single page regardless of
/// break flags.
pub struct StepPaginator<'a> {
    spec: &'a QuestionnaireSpec,
    answers: &'a AnswerMap,
    /// Raw page layout: indices into `spec.questions`, before exclusions.
    pages: Vec<Vec<usize>>,
}

impl<'a> StepPaginator<'a> {
    pub fn new(spec: &'a QuestionnaireSpec, answers: &'a AnswerMap) -> Self {
        let mut pages: Vec<Vec<usize>> = vec![Vec::new()];
        for (index, question) in spec.questions.iter().enumerate() {
            if spec.multi_step && question.page_break && index > 0 {
                pages.push(Vec::new());
            }
            if let Some(page) = pages.last_mut() {
                page.push(index);
            }
        }
        Self {
            spec,
            answers,
            pages,
        }
    }

    pub fn num_pages(&self) -> usize {
        self.pages.len()
    }

    /// The page content for `number`.
    ///
    /// Page 0 fails with [`FlowError::PageOutOfRange`]; requests past the
    /// end clamp to the final page and mark it terminal.
    pub fn page(&self, number: usize) -> Result<StepPage, FlowError> {
        if number == 0 {
            return Err(FlowError::PageOutOfRange(0));
        }
        let state = self.exclusions()?;
        let clamped = number.min(self.num_pages());

        let questions = self.pages[clamped - 1]
            .iter()
            .filter(|index| !state.excluded[**index])
            .map(|index| self.spec.questions[*index].clone())
            .collect();

        let has_next = !state.ended
            && self.pages[clamped..]
                .iter()
                .flatten()
                .any(|index| !state.excluded[*index]);

        Ok(StepPage {
            number: clamped,
            questions,
            has_previous: clamped > 1,
            has_next,
            is_terminal: number > self.num_pages(),
        })
    }

    /// The page the flow moves to after `page`, skipping pages whose
    /// questions were all excluded by a jump.
    pub fn advance_from(&self, page: &StepPage) -> Result<StepPage, FlowError> {
        let mut next = self.page(page.next_number())?;
        while next.questions.is_empty() && next.has_next && !next.is_terminal {
            next = self.page(next.next_number())?;
        }
        Ok(next)
    }

    /// Every question the current answers keep in the flow, in order.
    /// Finalization validates against exactly this set.
    pub fn included_questions(&self) -> Result<Vec<Question>, FlowError> {
        let state = self.exclusions()?;
        Ok(self
            .spec
            .questions
            .iter()
            .enumerate()
            .filter(|(index, _)| !state.excluded[*index])
            .map(|(_, question)| question.clone())
            .collect())
    }

    /// Walk the questions in order and mark the ones the answers given so
    /// far exclude from display and validation.
    ///
    /// Only included questions resolve their skip logic: a stale answer on
    /// an already-skipped question must not re-route the flow.
    fn exclusions(&self) -> Result<ExclusionState, FlowError> {
        let mut excluded = vec![false; self.spec.questions.len()];
        let mut ended = false;
        let mut skip_until: Option<usize> = None;

        // Single-step mode shows every question at once; branching never
        // engages.
        if !self.spec.multi_step {
            return Ok(ExclusionState { excluded, ended });
        }

        for (index, question) in self.spec.questions.iter().enumerate() {
            if ended {
                excluded[index] = true;
                continue;
            }
            if let Some(target) = skip_until {
                if index < target {
                    excluded[index] = true;
                    continue;
                }
                skip_until = None;
            }

            if !question.has_skipping() {
                continue;
            }
            let Some(answer) = self.answers.get(&question.clean_name) else {
                continue;
            };
            let Some(value) = answer.as_single() else {
                continue;
            };
            if value.is_empty() {
                continue;
            }

            match resolve(question, value)? {
                SkipAction::Next => {}
                SkipAction::End => ended = true,
                SkipAction::Question { target } => {
                    let target_index = self.spec.question_position(&target).ok_or_else(|| {
                        SpecError::InvalidJumpTarget {
                            question: question.clean_name.clone(),
                            target: target.clone(),
                        }
                    })?;
                    // A jump must leave the source's page; landing on the
                    // same or an earlier page would loop the respondent.
                    if self.page_of(target_index) <= self.page_of(index) {
                        return Err(SpecError::InvalidJumpTarget {
                            question: question.clean_name.clone(),
                            target,
                        }
                        .into());
                    }
                    skip_until = Some(target_index);
                }
            }
        }

        Ok(ExclusionState { excluded, ended })
    }

    /// 1-based page number holding the question at `question_index`.
    fn page_of(&self, question_index: usize) -> usize {
        self.pages
            .iter()
            .position(|page| page.contains(&question_index))
            .map(|position| position + 1)
            .unwrap_or(1)
    }
}
