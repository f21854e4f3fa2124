//! In-memory repositories for unit and router tests.
//!
//! Guarded transitions run under a single mutex, which gives the same
//! compare-and-set semantics the conditional `UPDATE` has in PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;

use crate::models::live_session::{LiveSession, SessionStatus, SessionTransition};
use crate::models::question::{NewAnswer, NewQuestion, Question, QuestionResult};
use crate::repositories::{LiveSessionRepositoryTrait, QuestionRepositoryTrait};
use crate::types::{CourseId, QuestionId, SessionId, StudentId};

#[derive(Debug, Default)]
pub struct InMemoryLiveSessionRepository {
    inner: Mutex<LiveSessionTable>,
}

#[derive(Debug, Default)]
struct LiveSessionTable {
    next_id: i64,
    rows: Vec<LiveSession>,
}

impl InMemoryLiveSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<LiveSession> {
        self.inner.lock().expect("lock sessions").rows.clone()
    }

    fn apply<F>(&self, matches: F, transition: SessionTransition) -> bool
    where
        F: Fn(&LiveSession) -> bool,
    {
        let mut table = self.inner.lock().expect("lock sessions");
        let Some(row) = table
            .rows
            .iter_mut()
            .find(|row| matches(row) && row.status == transition.from_status())
        else {
            return false;
        };
        row.status = transition.to_status();
        match transition {
            SessionTransition::Start => row.started_at = Some(Utc::now()),
            SessionTransition::End => row.ended_at = Some(Utc::now()),
        }
        true
    }
}

#[async_trait]
impl LiveSessionRepositoryTrait for InMemoryLiveSessionRepository {
    async fn insert_pending(
        &self,
        course_id: CourseId,
        stream_key: &str,
    ) -> Result<LiveSession, sqlx::Error> {
        let mut table = self.inner.lock().expect("lock sessions");
        if table.rows.iter().any(|row| row.stream_key == stream_key) {
            return Err(sqlx::Error::Protocol("duplicate stream key".into()));
        }
        table.next_id += 1;
        let session = LiveSession {
            id: SessionId::new(table.next_id),
            course_id,
            stream_key: stream_key.to_string(),
            status: SessionStatus::Pending,
            started_at: None,
            ended_at: None,
            provisioned_at: None,
            created_at: Utc::now(),
        };
        table.rows.push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<LiveSession>, sqlx::Error> {
        let table = self.inner.lock().expect("lock sessions");
        Ok(table.rows.iter().find(|row| row.id == id).cloned())
    }

    async fn mark_provisioned(&self, id: SessionId) -> Result<bool, sqlx::Error> {
        let mut table = self.inner.lock().expect("lock sessions");
        match table
            .rows
            .iter_mut()
            .find(|row| row.id == id && row.provisioned_at.is_none())
        {
            Some(row) => {
                row.provisioned_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn transition_by_id(
        &self,
        id: SessionId,
        transition: SessionTransition,
    ) -> Result<bool, sqlx::Error> {
        Ok(self.apply(|row| row.id == id, transition))
    }

    async fn transition_by_stream_key(
        &self,
        stream_key: &str,
        transition: SessionTransition,
    ) -> Result<bool, sqlx::Error> {
        Ok(self.apply(|row| row.stream_key == stream_key, transition))
    }

    async fn delete(&self, id: SessionId) -> Result<bool, sqlx::Error> {
        let mut table = self.inner.lock().expect("lock sessions");
        let before = table.rows.len();
        table.rows.retain(|row| row.id != id);
        Ok(table.rows.len() != before)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryQuestionRepository {
    inner: Mutex<QuestionTables>,
}

#[derive(Debug, Default)]
struct QuestionTables {
    next_id: i64,
    questions: Vec<Question>,
    answers: Vec<(QuestionId, StudentId, String)>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepositoryTrait for InMemoryQuestionRepository {
    async fn create(&self, question: &NewQuestion) -> Result<Question, sqlx::Error> {
        let mut tables = self.inner.lock().expect("lock questions");
        tables.next_id += 1;
        let created = Question {
            id: QuestionId::new(tables.next_id),
            course_id: question.course_id,
            question_type: question.question_type,
            content: question.content.clone(),
            options: question.options.clone(),
            answer: question.answer.clone(),
            created_at: Utc::now(),
        };
        tables.questions.push(created.clone());
        Ok(created)
    }

    async fn find_for_course(
        &self,
        course_id: CourseId,
        id: QuestionId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let tables = self.inner.lock().expect("lock questions");
        Ok(tables
            .questions
            .iter()
            .find(|q| q.id == id && q.course_id == course_id)
            .cloned())
    }

    async fn insert_answer(&self, answer: &NewAnswer) -> Result<bool, sqlx::Error> {
        let mut tables = self.inner.lock().expect("lock questions");
        if !tables.questions.iter().any(|q| q.id == answer.question_id) {
            return Ok(false);
        }
        tables
            .answers
            .push((answer.question_id, answer.student_id, answer.answer.clone()));
        Ok(true)
    }

    async fn tally(&self, id: QuestionId) -> Result<Option<QuestionResult>, sqlx::Error> {
        let tables = self.inner.lock().expect("lock questions");
        let Some(question) = tables.questions.iter().find(|q| q.id == id) else {
            return Ok(None);
        };
        let answers = tables.answers.iter().filter(|(qid, _, _)| *qid == id);
        let (total, correct) = answers.fold((0, 0), |(total, correct), (_, _, text)| {
            (total + 1, correct + i64::from(*text == question.answer))
        });
        Ok(Some(QuestionResult {
            question_id: id,
            total,
            correct,
        }))
    }
}
