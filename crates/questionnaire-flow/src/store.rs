use std::collections::BTreeMap;

use questionnaire_spec::AnswerMap;

use crate::submission::SubmissionRecord;

/// Identifies one respondent's in-progress run of one questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SessionKey {
    pub questionnaire_id: String,
    pub session_token: String,
}

impl SessionKey {
    pub fn new(questionnaire_id: &str, session_token: &str) -> Self {
        Self {
            questionnaire_id: questionnaire_id.to_string(),
            session_token: session_token.to_string(),
        }
    }
}

/// Session-backed answer persistence supplied by the surrounding platform.
/// Backing store and expiry policy are the platform's concern.
pub trait AnswerStore {
    fn get(&self, key: &SessionKey) -> Option<AnswerMap>;
    fn put(&mut self, key: &SessionKey, answers: AnswerMap);
    fn delete(&mut self, key: &SessionKey);
}

/// Durable storage for finalized submissions.
pub trait SubmissionStore {
    fn append(&mut self, record: SubmissionRecord);
    fn for_questionnaire(&self, questionnaire_id: &str) -> Vec<&SubmissionRecord>;
    fn has_submission(&self, questionnaire_id: &str, respondent: Option<&str>) -> bool;
}

/// In-memory session store for tests and the CLI runner.
#[derive(Debug, Default)]
pub struct MemoryAnswerStore {
    sessions: BTreeMap<SessionKey, AnswerMap>,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl AnswerStore for MemoryAnswerStore {
    fn get(&self, key: &SessionKey) -> Option<AnswerMap> {
        self.sessions.get(key).cloned()
    }

    fn put(&mut self, key: &SessionKey, answers: AnswerMap) {
        self.sessions.insert(key.clone(), answers);
    }

    fn delete(&mut self, key: &SessionKey) {
        self.sessions.remove(key);
    }
}

/// In-memory submission store for tests and the CLI runner.
#[derive(Debug, Default)]
pub struct MemorySubmissionStore {
    records: Vec<SubmissionRecord>,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[SubmissionRecord] {
        &self.records
    }
}

impl SubmissionStore for MemorySubmissionStore {
    fn append(&mut self, record: SubmissionRecord) {
        self.records.push(record);
    }

    fn for_questionnaire(&self, questionnaire_id: &str) -> Vec<&SubmissionRecord> {
        self.records
            .iter()
            .filter(|record| record.questionnaire_id == questionnaire_id)
            .collect()
    }

    fn has_submission(&self, questionnaire_id: &str, respondent: Option<&str>) -> bool {
        self.records.iter().any(|record| {
            record.questionnaire_id == questionnaire_id
                && record.respondent.as_deref() == respondent
        })
    }
}
