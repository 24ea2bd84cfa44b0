//! Axum route handlers for the interview API.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interview::evaluation::evaluate;
use crate::interview::followup::gen_followup;
use crate::interview::models::{Evaluation, FinalReport, Question, Resume};
use crate::interview::questions::gen_questions;
use crate::interview::report::final_report;
use crate::interview::resume::extract_resume;
use crate::state::AppState;

/// Multipart field carrying the resume PDF.
const RESUME_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResumeResponse {
    pub resume: Resume,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionsRequest {
    pub resume: Resume,
    /// Overrides the configured question count.
    #[serde(default)]
    pub num: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub followup: String,
    pub evaluation: Evaluation,
}

#[derive(Debug, Deserialize)]
pub struct FinalReportRequest {
    pub evaluations: Vec<Evaluation>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /upload_resume
///
/// Buffers the uploaded PDF and returns the extracted resume fields.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ResumeResponse>, AppError> {
    let pdf_bytes = read_file_field(multipart).await?;
    info!("Received resume upload ({} bytes)", pdf_bytes.len());

    let resume = extract_resume(pdf_bytes, &state.model).await?;
    Ok(Json(ResumeResponse { resume }))
}

/// POST /generate_questions
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<Json<GenerateQuestionsResponse>, AppError> {
    let num = request.num.unwrap_or(state.config.question_count);
    let questions = gen_questions(&request.resume, num, &state.model).await?;
    Ok(Json(GenerateQuestionsResponse { questions }))
}

/// POST /answer
///
/// Produces a follow-up question and an evaluation for one answer. Both
/// generations are issued together; the runtime serializes them.
pub async fn handle_answer(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let (followup, evaluation) = tokio::try_join!(
        gen_followup(&request.question, &request.answer, &state.model),
        evaluate(&request.question, &request.answer, &state.model),
    )?;
    Ok(Json(AnswerResponse {
        followup,
        evaluation,
    }))
}

/// POST /final_report
pub async fn handle_final_report(
    Json(request): Json<FinalReportRequest>,
) -> Json<FinalReport> {
    Json(final_report(&request.evaluations))
}

async fn read_file_field(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Upload(e.body_text()))?
    {
        if field.name() == Some(RESUME_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::Upload(e.body_text()));
        }
    }
    Err(AppError::Upload(format!(
        "missing '{RESUME_FIELD}' field in multipart form"
    )))
}
