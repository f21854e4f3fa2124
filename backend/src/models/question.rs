//! Quiz questions, submitted answers and tallies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::types::{CourseId, QuestionId, StudentId};
use crate::validation::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::ShortAnswer => "short_answer",
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultipleChoice
        )
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown question type: {0}")]
pub struct UnknownQuestionType(pub String);

impl FromStr for QuestionType {
    type Err = UnknownQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single_choice" => Ok(QuestionType::SingleChoice),
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "true_false" => Ok(QuestionType::TrueFalse),
            "short_answer" => Ok(QuestionType::ShortAnswer),
            other => Err(UnknownQuestionType(other.to_string())),
        }
    }
}

impl TryFrom<String> for QuestionType {
    type Error = UnknownQuestionType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Question {
    pub id: QuestionId,
    pub course_id: CourseId,
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub question_type: QuestionType,
    pub content: String,
    pub options: Vec<String>,
    /// Correct answer text.
    pub answer: String,
    pub created_at: DateTime<Utc>,
}

/// Student-facing view of a question; the correct answer is withheld.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionPushResponse {
    pub id: QuestionId,
    pub course_id: CourseId,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub options: Vec<String>,
}

impl From<Question> for QuestionPushResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            course_id: question.course_id,
            question_type: question.question_type,
            content: question.content,
            options: question.options,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_question_shape"))]
/// Payload for creating a question.
pub struct CreateQuestionRequest {
    #[validate(range(min = 1, message = "course_id must be a positive integer"))]
    pub course_id: i64,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    #[validate(
        length(max = 4000),
        custom(function = "rules::validate_not_blank")
    )]
    pub content: String,
    #[serde(default)]
    #[validate(custom(function = "rules::validate_options"))]
    pub options: Vec<String>,
    #[validate(length(max = 1000), custom(function = "rules::validate_not_blank"))]
    pub answer: String,
}

fn validate_question_shape(payload: &CreateQuestionRequest) -> Result<(), ValidationError> {
    if payload.question_type.is_choice() && payload.options.len() < 2 {
        return Err(ValidationError::new("choice_requires_two_options"));
    }
    if payload.question_type.is_choice() && !answer_uses_options(payload) {
        return Err(ValidationError::new("choice_answer_not_an_option"));
    }
    if payload.question_type == QuestionType::TrueFalse
        && !matches!(payload.answer.trim(), "true" | "false")
    {
        return Err(ValidationError::new("true_false_answer_invalid"));
    }
    Ok(())
}

/// Single choice answers name one option; multiple choice answers are a
/// comma separated list of options.
fn answer_uses_options(payload: &CreateQuestionRequest) -> bool {
    let is_option = |choice: &str| payload.options.iter().any(|o| o.trim() == choice);
    let answer = payload.answer.trim();
    match payload.question_type {
        QuestionType::MultipleChoice => answer
            .split(',')
            .map(str::trim)
            .all(|choice| !choice.is_empty() && is_option(choice)),
        _ => is_option(answer),
    }
}

/// Fields written when a question is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    pub course_id: CourseId,
    pub question_type: QuestionType,
    pub content: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl From<CreateQuestionRequest> for NewQuestion {
    fn from(payload: CreateQuestionRequest) -> Self {
        Self {
            course_id: CourseId::new(payload.course_id),
            question_type: payload.question_type,
            content: payload.content.trim().to_string(),
            options: payload
                .options
                .into_iter()
                .map(|o| o.trim().to_string())
                .collect(),
            answer: payload.answer.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
/// Payload for submitting an answer.
pub struct SubmitAnswerRequest {
    #[validate(range(min = 1, message = "question_id must be a positive integer"))]
    pub question_id: i64,
    #[validate(range(min = 1, message = "student_id must be a positive integer"))]
    pub student_id: i64,
    #[validate(length(max = 1000), custom(function = "rules::validate_not_blank"))]
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub question_id: QuestionId,
    pub student_id: StudentId,
    pub answer: String,
}

impl From<SubmitAnswerRequest> for NewAnswer {
    fn from(payload: SubmitAnswerRequest) -> Self {
        Self {
            question_id: QuestionId::new(payload.question_id),
            student_id: StudentId::new(payload.student_id),
            answer: payload.answer.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub total: i64,
    pub correct: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_payload(options: Vec<&str>) -> CreateQuestionRequest {
        CreateQuestionRequest {
            course_id: 42,
            question_type: QuestionType::SingleChoice,
            content: "2 + 2 = ?".into(),
            options: options.into_iter().map(String::from).collect(),
            answer: "B".into(),
        }
    }

    #[test]
    fn choice_question_needs_two_options() {
        assert!(choice_payload(vec!["A"]).validate().is_err());
        assert!(choice_payload(vec!["A", "B"]).validate().is_ok());
    }

    #[test]
    fn choice_answer_must_be_one_of_the_options() {
        let mut payload = choice_payload(vec!["A", "B"]);
        payload.answer = "C".into();
        assert!(payload.validate().is_err());
        payload.answer = " A ".into();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn multiple_choice_answer_lists_options() {
        let mut payload = CreateQuestionRequest {
            course_id: 1,
            question_type: QuestionType::MultipleChoice,
            content: "Which are primes?".into(),
            options: vec!["2".into(), "4".into(), "5".into()],
            answer: "2, 5".into(),
        };
        assert!(payload.validate().is_ok());
        payload.answer = "2,6".into();
        assert!(payload.validate().is_err());
        payload.answer = "2,".into();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn true_false_answer_must_be_boolean_text() {
        let mut payload = CreateQuestionRequest {
            course_id: 1,
            question_type: QuestionType::TrueFalse,
            content: "The sky is blue".into(),
            options: vec![],
            answer: "yes".into(),
        };
        assert!(payload.validate().is_err());
        payload.answer = "true".into();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn blank_content_is_rejected() {
        let mut payload = choice_payload(vec!["A", "B"]);
        payload.content = "   ".into();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("content"));
    }

    #[test]
    fn question_type_uses_type_key_in_json() {
        let payload: CreateQuestionRequest = serde_json::from_str(
            r#"{"course_id":3,"type":"short_answer","content":"Name a prime","answer":"7"}"#,
        )
        .expect("deserialize");
        assert_eq!(payload.question_type, QuestionType::ShortAnswer);
        assert!(payload.options.is_empty());
    }

    #[test]
    fn push_view_drops_correct_answer() {
        let question = Question {
            id: QuestionId::new(5),
            course_id: CourseId::new(3),
            question_type: QuestionType::ShortAnswer,
            content: "Name a prime".into(),
            options: vec![],
            answer: "7".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(QuestionPushResponse::from(question)).expect("json");
        assert!(json.get("answer").is_none());
        assert_eq!(json["type"], "short_answer");
    }

    #[test]
    fn submit_answer_is_trimmed() {
        let new_answer = NewAnswer::from(SubmitAnswerRequest {
            question_id: 1,
            student_id: 2,
            answer: " B ".into(),
        });
        assert_eq!(new_answer.answer, "B");
    }
}
