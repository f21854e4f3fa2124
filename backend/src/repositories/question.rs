//! Quiz repository: questions, answers and tallies.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::question::{NewAnswer, NewQuestion, Question, QuestionResult};
use crate::types::{CourseId, QuestionId};

const SELECT_COLUMNS: &str = "id, course_id, question_type, content, options, answer, created_at";

/// This trait is designed to be mockable using mockall for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepositoryTrait: Send + Sync {
    async fn create(&self, question: &NewQuestion) -> Result<Question, sqlx::Error>;

    /// Looks a question up only if it belongs to `course_id`.
    async fn find_for_course(
        &self,
        course_id: CourseId,
        id: QuestionId,
    ) -> Result<Option<Question>, sqlx::Error>;

    /// Records an answer. Returns `false` when the question does not exist.
    async fn insert_answer(&self, answer: &NewAnswer) -> Result<bool, sqlx::Error>;

    /// Counts all answers and correct answers; `None` for an unknown question.
    async fn tally(&self, id: QuestionId) -> Result<Option<QuestionResult>, sqlx::Error>;
}

#[derive(Debug, Clone)]
pub struct QuestionRepository {
    pool: PgPool,
}

impl QuestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QuestionRepositoryTrait for QuestionRepository {
    async fn create(&self, question: &NewQuestion) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions (course_id, question_type, content, options, answer) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            SELECT_COLUMNS
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(question.course_id)
            .bind(question.question_type.as_str())
            .bind(&question.content)
            .bind(&question.options)
            .bind(&question.answer)
            .fetch_one(&self.pool)
            .await
    }

    async fn find_for_course(
        &self,
        course_id: CourseId,
        id: QuestionId,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM questions WHERE id = $1 AND course_id = $2",
            SELECT_COLUMNS
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn insert_answer(&self, answer: &NewAnswer) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO answers (question_id, student_id, answer)
            SELECT q.id, $2, $3
            FROM questions q
            WHERE q.id = $1
            "#,
        )
        .bind(answer.question_id)
        .bind(answer.student_id)
        .bind(&answer.answer)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn tally(&self, id: QuestionId) -> Result<Option<QuestionResult>, sqlx::Error> {
        sqlx::query_as::<_, QuestionResult>(
            r#"
            SELECT q.id AS question_id,
                   COUNT(a.id) AS total,
                   COUNT(a.id) FILTER (WHERE a.answer = q.answer) AS correct
            FROM questions q
            LEFT JOIN answers a ON a.question_id = q.id
            WHERE q.id = $1
            GROUP BY q.id
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
