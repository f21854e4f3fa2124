//! Classroom quiz endpoints.

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppError,
    models::{
        question::{
            CreateQuestionRequest, NewAnswer, NewQuestion, Question, QuestionPushResponse,
            QuestionResult, SubmitAnswerRequest,
        },
        MessageResponse,
    },
    state::AppState,
    types::{CourseId, QuestionId},
    validation::ValidatedJson,
};

const QUESTION_NOT_FOUND: &str = "Question not found";

pub async fn create_question(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), AppError> {
    let question = state.questions.create(&NewQuestion::from(payload)).await?;
    tracing::info!(
        question_id = %question.id,
        course_id = %question.course_id,
        question_type = question.question_type.as_str(),
        "Question created"
    );
    Ok((StatusCode::CREATED, Json(question)))
}

pub async fn push_question(
    State(state): State<AppState>,
    path: Result<Path<(CourseId, QuestionId)>, PathRejection>,
) -> Result<Json<QuestionPushResponse>, AppError> {
    let Path((course_id, question_id)) = path?;
    let question = state
        .questions
        .find_for_course(course_id, question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(QUESTION_NOT_FOUND.into()))?;
    Ok(Json(QuestionPushResponse::from(question)))
}

pub async fn submit_answer(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SubmitAnswerRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let answer = NewAnswer::from(payload);
    if !state.questions.insert_answer(&answer).await? {
        return Err(AppError::NotFound(QUESTION_NOT_FOUND.into()));
    }
    tracing::debug!(
        question_id = %answer.question_id,
        student_id = %answer.student_id,
        "Answer recorded"
    );
    Ok(Json(MessageResponse::new("Answer submitted")))
}

pub async fn question_result(
    State(state): State<AppState>,
    path: Result<Path<QuestionId>, PathRejection>,
) -> Result<Json<QuestionResult>, AppError> {
    let Path(question_id) = path?;
    let result = state
        .questions
        .tally(question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(QUESTION_NOT_FOUND.into()))?;
    Ok(Json(result))
}
