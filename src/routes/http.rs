//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs include parameters and basic result info.

use std::sync::Arc;

use axum::{extract::{Query, State}, response::IntoResponse, Json};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::eval::evaluate_submission;
use crate::logic::{generate_content, generate_questions};
use crate::protocol::*;
use crate::seeds::{CONTENT_TYPES, QUESTION_TYPES, SUBJECTS};
use crate::state::AppState;
use crate::store::ProgressEntry;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { status: "healthy", agents_loaded: state.openai.is_some() })
}

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic, subject = %body.subject))]
pub async fn http_generate_content(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ContentRequest>,
) -> Result<Json<ContentResponse>, ApiError> {
  if body.topic.trim().is_empty() {
    return Err(ApiError::InvalidInput("topic must be non-empty".into()));
  }
  let generated = generate_content(
    &state,
    &body.topic,
    &body.subject,
    &body.difficulty,
    &body.content_type,
    body.learning_objectives.as_deref(),
  ).await;
  info!(target: "tutor_backend", topic = %body.topic, "HTTP content served");
  Ok(Json(generated.into()))
}

#[instrument(level = "info", skip(state, body), fields(count = body.question_count, subject = %body.subject))]
pub async fn http_generate_questions(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
  if body.question_count == 0 {
    return Err(ApiError::InvalidInput("questionCount must be at least 1".into()));
  }
  let (questions, metadata) = generate_questions(
    &state,
    &body.content,
    body.question_count,
    &body.question_types,
    &body.difficulty,
    &body.subject,
  ).await;
  info!(target: "tutor_backend", served = questions.len(), "HTTP questions served");
  Ok(Json(QuestionResponse { questions, metadata }))
}

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic, questions = body.questions.len(), answers = body.answers.len()))]
pub async fn http_evaluate_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizSubmission>,
) -> Result<Json<FeedbackResponse>, ApiError> {
  let result = evaluate_submission(
    state.openai.as_ref(),
    &state.prompts,
    &body.topic,
    &body.questions,
    &body.answers,
  ).await?;

  // Persistence is best-effort: a store failure degrades the response, it
  // never invalidates the evaluation.
  let submission_id = Uuid::new_v4().to_string();
  let mut degraded = false;
  let entry = ProgressEntry::from_result(submission_id.clone(), &body.topic, &result);
  if let Err(e) = state.store.save(entry) {
    warn!(target: "quiz", %submission_id, error = %e, "Progress write failed; returning result in degraded mode");
    degraded = true;
  }

  info!(target: "quiz", %submission_id, score = result.overall_score, degraded, "HTTP quiz evaluated");
  let analysis = detailed_analysis(&result);
  Ok(Json(FeedbackResponse {
    score: result.overall_score,
    per_question: result.per_question.iter().map(PerQuestionOut::from).collect(),
    feedback: result.feedback,
    recommendations: result.recommendations,
    detailed_analysis: analysis,
    submission_id,
    degraded,
  }))
}

#[instrument(level = "info", skip(state), fields(limit = q.limit))]
pub async fn http_get_progress(
  State(state): State<Arc<AppState>>,
  Query(q): Query<ProgressQuery>,
) -> impl IntoResponse {
  let limit = q.limit.unwrap_or(10).min(100);
  let results = match state.store.recent(limit) {
    Ok(entries) => entries.into_iter().map(ProgressOut::from).collect(),
    Err(e) => {
      warn!(target: "quiz", error = %e, "Progress read failed; serving empty history");
      vec![]
    }
  };
  Json(ProgressResponse { results })
}

#[instrument(level = "info")]
pub async fn http_get_subjects() -> impl IntoResponse {
  Json(SubjectsOut { subjects: SUBJECTS.to_vec() })
}

#[instrument(level = "info")]
pub async fn http_get_content_types() -> impl IntoResponse {
  Json(ContentTypesOut { content_types: CONTENT_TYPES.to_vec() })
}

#[instrument(level = "info")]
pub async fn http_get_question_types() -> impl IntoResponse {
  Json(QuestionTypesOut { question_types: QUESTION_TYPES.to_vec() })
}
