//! HTTP endpoint handlers. These are thin, stateless wrappers over the
//! generation client and the grader; the interactive flow lives on `/ws`.

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, response::{IntoResponse, Response}, Json};
use tracing::{error, info, instrument};

use crate::grading::grade;
use crate::lessons::is_known;
use crate::protocol::*;
use crate::state::AppState;
use crate::strings;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, generation_enabled: state.gemini.has_api_key() })
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_lessons(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(LessonsOut { lessons: state.config.lessons.clone() })
}

#[instrument(level = "info", skip(state, body), fields(lesson = %body.lesson))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  Json(body): Json<QuizIn>,
) -> Response {
  if !is_known(&state.config.lessons, &body.lesson) {
    return (StatusCode::BAD_REQUEST, Json(ErrorOut { error: strings::UNKNOWN_LESSON.into() })).into_response();
  }
  let student = body.student_name.as_deref().unwrap_or(&state.config.student_name);
  match state.generate_quiz_for(&body.lesson, student).await {
    Ok(quiz) => {
      info!(target: "quiz", lesson = %body.lesson, questions = quiz.questions.len(), "HTTP quiz served");
      Json(quiz).into_response()
    }
    Err(e) => {
      error!(target: "quiz", lesson = %body.lesson, error = %e, "HTTP quiz generation failed");
      (StatusCode::BAD_GATEWAY, Json(ErrorOut { error: strings::GENERATION_FAILED.into() })).into_response()
    }
  }
}

#[instrument(level = "info", skip(body), fields(questions = body.quiz.questions.len(), answered = body.answers.len()))]
pub async fn http_post_grade(Json(body): Json<GradeIn>) -> impl IntoResponse {
  let report = grade(&body.quiz, &body.answers);
  info!(target: "quiz", score = report.score, total = report.total, "HTTP grade evaluated");
  Json(report)
}
