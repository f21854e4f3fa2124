#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    handlers::health::HealthResponse,
    models::{
        live_session::{
            CreateLiveSessionRequest, LiveSessionResponse, PlaybackUrls, SessionStatus,
            StreamStatusCallback,
        },
        question::{
            CreateQuestionRequest, Question, QuestionPushResponse, QuestionResult, QuestionType,
            SubmitAnswerRequest,
        },
        MessageResponse,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        create_live_session_doc,
        get_live_session_doc,
        start_live_session_doc,
        end_live_session_doc,
        stream_status_doc,
        create_question_doc,
        push_question_doc,
        submit_answer_doc,
        question_result_doc,
        health_doc
    ),
    components(
        schemas(
            // live sessions
            CreateLiveSessionRequest,
            LiveSessionResponse,
            PlaybackUrls,
            SessionStatus,
            StreamStatusCallback,
            // quiz
            CreateQuestionRequest,
            Question,
            QuestionType,
            QuestionPushResponse,
            SubmitAnswerRequest,
            QuestionResult,
            // shared
            MessageResponse,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Live", description = "Live session lifecycle and media server callbacks"),
        (name = "Quiz", description = "In-class questions and answers"),
        (name = "Ops", description = "Health")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    post,
    path = "/api/live/sessions",
    request_body = CreateLiveSessionRequest,
    responses(
        (
            status = 201,
            description = "Session created in pending state",
            body = LiveSessionResponse
        ),
        (status = 400, description = "Invalid course id", body = ErrorResponse),
        (status = 500, description = "Store or streaming backend failure", body = ErrorResponse)
    ),
    tag = "Live"
)]
fn create_live_session_doc() {}

#[utoipa::path(
    get,
    path = "/api/live/sessions/{id}",
    params(("id" = i64, Path, description = "Session id")),
    responses(
        (
            status = 200,
            description = "Play URLs are present only while live",
            body = LiveSessionResponse
        ),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Live"
)]
fn get_live_session_doc() {}

#[utoipa::path(
    post,
    path = "/api/live/sessions/{id}/start",
    params(("id" = i64, Path, description = "Session id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Not found or not pending", body = ErrorResponse)
    ),
    tag = "Live"
)]
fn start_live_session_doc() {}

#[utoipa::path(
    post,
    path = "/api/live/sessions/{id}/end",
    params(("id" = i64, Path, description = "Session id")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, description = "Not found or not live", body = ErrorResponse)
    ),
    tag = "Live"
)]
fn end_live_session_doc() {}

#[utoipa::path(
    post,
    path = "/api/live/status",
    request_body = StreamStatusCallback,
    responses(
        (status = 200, description = "Acknowledged, including no-ops", body = MessageResponse),
        (status = 400, description = "Malformed stream path", body = ErrorResponse),
        (status = 500, body = ErrorResponse)
    ),
    tag = "Live"
)]
fn stream_status_doc() {}

#[utoipa::path(
    post,
    path = "/api/question/create",
    request_body = CreateQuestionRequest,
    responses(
        (status = 201, body = Question),
        (status = 400, body = ErrorResponse)
    ),
    tag = "Quiz"
)]
fn create_question_doc() {}

#[utoipa::path(
    get,
    path = "/api/question/push/{course_id}/{question_id}",
    params(
        ("course_id" = i64, Path, description = "Course id"),
        ("question_id" = i64, Path, description = "Question id")
    ),
    responses(
        (status = 200, description = "Question without its answer", body = QuestionPushResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Quiz"
)]
fn push_question_doc() {}

#[utoipa::path(
    post,
    path = "/api/question/submit",
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, body = MessageResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, description = "Unknown question", body = ErrorResponse)
    ),
    tag = "Quiz"
)]
fn submit_answer_doc() {}

#[utoipa::path(
    get,
    path = "/api/question/result/{question_id}",
    params(("question_id" = i64, Path, description = "Question id")),
    responses(
        (status = 200, body = QuestionResult),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Quiz"
)]
fn question_result_doc() {}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, body = HealthResponse),
        (status = 503, body = ErrorResponse)
    ),
    tag = "Ops"
)]
fn health_doc() {}
