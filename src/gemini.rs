//! Minimal Gemini client for quiz generation.
//!
//! We only call `models/{model}:generateContent` with a JSON response schema.
//! Calls are instrumented and log model name, latency and token usage (not contents).
//!
//! NOTE: We never log the API key.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use crate::config::{GenerationSettings, ImagePolicy, Prompts};
use crate::domain::{Quiz, QUIZ_LENGTH};
use crate::error::{ConfigurationError, GenerationError};
use crate::prompt::{build_quiz_prompt, quiz_response_schema};
use crate::sanitize::clean_quiz;
use crate::util::trunc_for_log;

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const API_KEY_FALLBACK_VAR: &str = "API_KEY";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Finish reasons that mean the model refused rather than ran out of room.
const REFUSAL_REASONS: [&str; 5] = ["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  api_key: Option<String>,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl Gemini {
  pub fn new(client: reqwest::Client, api_key: Option<String>, base_url: String, model: String, temperature: f32) -> Self {
    Self { client, api_key, base_url: base_url.trim_end_matches('/').to_string(), model, temperature }
  }

  /// Construct the client from env. A missing API key is not an error here:
  /// it only fails the generation calls that need it.
  pub fn from_env(settings: &GenerationSettings) -> Self {
    let api_key = std::env::var(API_KEY_VAR)
      .or_else(|_| std::env::var(API_KEY_FALLBACK_VAR))
      .ok()
      .filter(|k| !k.trim().is_empty());
    let base_url = std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(settings.timeout_secs))
      .build()
      .unwrap_or_else(|e| {
        warn!(target: "quiz_tutor", error = %e, "HTTP client builder failed; using defaults");
        reqwest::Client::new()
      });

    Self::new(client, api_key, base_url, model, settings.temperature)
  }

  pub fn has_api_key(&self) -> bool {
    self.api_key.is_some()
  }

  /// One structured-output call. Returns the raw text of the first candidate.
  #[instrument(level = "info", skip(self, prompt, schema), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError> {
    let api_key = self
      .api_key
      .as_deref()
      .ok_or(ConfigurationError::MissingApiKey { var: API_KEY_VAR })?;

    let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
    let req = GenerateContentRequest {
      contents: vec![Content { role: "user", parts: vec![PartReq { text: prompt }] }],
      generation_config: GenerationConfig {
        response_mime_type: "application/json",
        response_schema: schema,
        temperature: self.temperature,
      },
    };

    let res = self
      .client
      .post(&url)
      .header(USER_AGENT, "quiz-tutor/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-goog-api-key", api_key)
      .json(&req)
      .send()
      .await?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_provider_error(&body).unwrap_or_else(|| trunc_for_log(&body, 300));
      return Err(GenerationError::Status { status: status.as_u16(), message });
    }

    let body: GenerateContentResponse = res.json().await?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }
    extract_text(body)
  }

  /// Generate, validate and sanitize a quiz for `lesson_title`.
  #[instrument(level = "info", skip(self, prompts, images), fields(%lesson_title, model = %self.model))]
  pub async fn generate_quiz(
    &self,
    prompts: &Prompts,
    images: &ImagePolicy,
    lesson_title: &str,
    student_name: &str,
  ) -> Result<Quiz, GenerationError> {
    if lesson_title.trim().is_empty() {
      return Err(GenerationError::InvalidRequest("lesson title is empty".into()));
    }
    if student_name.trim().is_empty() {
      return Err(GenerationError::InvalidRequest("student name is empty".into()));
    }

    let prompt = build_quiz_prompt(&prompts.quiz_template, lesson_title.trim(), student_name.trim());
    let schema = quiz_response_schema();

    let start = Instant::now();
    let result = self.generate_json(&prompt, &schema).await;
    let elapsed = start.elapsed();

    let text = match result {
      Ok(t) => {
        info!(?elapsed, response_len = t.len(), "Model response received successfully");
        t
      }
      Err(e) => {
        error!(?elapsed, error = %e, "Model call failed during quiz generation");
        return Err(e);
      }
    };

    let quiz = parse_quiz(&text)?;
    let quiz = clean_quiz(quiz, images);
    info!(title = %quiz.title, questions = quiz.questions.len(), "Quiz successfully generated");
    Ok(quiz)
  }
}

/// Parse the model's JSON text into a quiz and check it is usable.
pub fn parse_quiz(text: &str) -> Result<Quiz, GenerationError> {
  let quiz: Quiz = serde_json::from_str(text.trim())?;
  validate_quiz(&quiz)?;
  Ok(quiz)
}

fn validate_quiz(quiz: &Quiz) -> Result<(), GenerationError> {
  if quiz.questions.len() != QUIZ_LENGTH {
    return Err(GenerationError::WrongQuestionCount { expected: QUIZ_LENGTH, actual: quiz.questions.len() });
  }

  let mut seen = HashSet::new();
  for q in &quiz.questions {
    let invalid = |reason: String| Err(GenerationError::InvalidQuiz { reason });
    if !seen.insert(q.id) {
      return invalid(format!("duplicate question id {}", q.id));
    }
    if q.kind == crate::domain::QuestionType::Matching {
      return invalid(format!("question {} uses the unsupported matching type", q.id));
    }
    if q.correct_answers.is_empty() {
      return invalid(format!("question {} has no correct answer", q.id));
    }
    if q.kind.needs_options() && q.options.as_ref().map_or(true, |o| o.is_empty()) {
      return invalid(format!("question {} has no options", q.id));
    }
  }
  Ok(())
}

/// Pull the answer text out of a provider response, mapping refusals to errors.
fn extract_text(body: GenerateContentResponse) -> Result<String, GenerationError> {
  if let Some(reason) = body.prompt_feedback.and_then(|f| f.block_reason) {
    return Err(GenerationError::Declined { reason });
  }
  let candidate = body
    .candidates
    .into_iter()
    .next()
    .ok_or_else(|| GenerationError::Declined { reason: "no candidates".into() })?;

  let finish = candidate.finish_reason.unwrap_or_default();
  if REFUSAL_REASONS.contains(&finish.as_str()) {
    return Err(GenerationError::Declined { reason: finish });
  }

  let text: String = candidate
    .content
    .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
    .unwrap_or_default();

  if text.trim().is_empty() {
    return Err(GenerationError::EmptyResponse);
  }
  Ok(text)
}

// --- generateContent DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
  contents: Vec<Content<'a>>,
  generation_config: GenerationConfig<'a>,
}
#[derive(Serialize)]
struct Content<'a> { role: &'a str, parts: Vec<PartReq<'a>> }
#[derive(Serialize)]
struct PartReq<'a> { text: &'a str }
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
  response_mime_type: &'a str,
  response_schema: &'a Value,
  temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] prompt_feedback: Option<PromptFeedback>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
  #[serde(default)] content: Option<CandidateContent>,
  #[serde(default)] finish_reason: Option<String>,
}
#[derive(Deserialize)]
struct CandidateContent { #[serde(default)] parts: Vec<PartResp> }
#[derive(Deserialize)]
struct PartResp { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback { #[serde(default)] block_reason: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

/// Try to extract a clean error message from a provider error body.
fn extract_provider_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{provider_envelope, sample_quiz};
  use axum::{http::{HeaderMap, StatusCode}, routing::post, Json, Router};
  use serde_json::json;
  use tokio::net::TcpListener;

  async fn spawn_provider(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
      "/models/:call",
      post(move |headers: HeaderMap| {
        let body = body.clone();
        async move {
          if headers.get("x-goog-api-key").is_none() {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": { "message": "missing key" } })));
          }
          (status, Json(body))
        }
      }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
  }

  fn client(base_url: String, api_key: Option<&str>) -> Gemini {
    Gemini::new(reqwest::Client::new(), api_key.map(String::from), base_url, DEFAULT_MODEL.into(), 0.7)
  }

  async fn generate(gemini: &Gemini) -> Result<Quiz, GenerationError> {
    gemini
      .generate_quiz(&Prompts::default(), &ImagePolicy::default(), "Bài 8: Biểu đồ cột", "Bạn nhỏ")
      .await
  }

  #[tokio::test]
  async fn generates_a_valid_quiz() {
    let text = serde_json::to_string(&sample_quiz(10)).unwrap();
    let base = spawn_provider(StatusCode::OK, provider_envelope(&text)).await;
    let quiz = generate(&client(base, Some("test-key"))).await.unwrap();
    assert_eq!(quiz.questions.len(), 10);
    assert_eq!(quiz.title, "Ôn tập Toán 4");
  }

  #[tokio::test]
  async fn missing_api_key_fails_before_network() {
    // Nothing listens on this address; a network attempt would be an Http error.
    let err = generate(&client("http://127.0.0.1:9".into(), None)).await.unwrap_err();
    assert!(matches!(err, GenerationError::Configuration(ConfigurationError::MissingApiKey { .. })));
  }

  #[tokio::test]
  async fn nine_questions_is_rejected() {
    let text = serde_json::to_string(&sample_quiz(9)).unwrap();
    let base = spawn_provider(StatusCode::OK, provider_envelope(&text)).await;
    let err = generate(&client(base, Some("k"))).await.unwrap_err();
    assert!(matches!(err, GenerationError::WrongQuestionCount { expected: 10, actual: 9 }));
  }

  #[tokio::test]
  async fn provider_error_message_is_surfaced() {
    let body = json!({ "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" } });
    let base = spawn_provider(StatusCode::BAD_REQUEST, body).await;
    match generate(&client(base, Some("bad"))).await.unwrap_err() {
      GenerationError::Status { status, message } => {
        assert_eq!(status, 400);
        assert_eq!(message, "API key not valid");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn blocked_prompt_is_declined() {
    let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
    let base = spawn_provider(StatusCode::OK, body).await;
    let err = generate(&client(base, Some("k"))).await.unwrap_err();
    assert!(matches!(err, GenerationError::Declined { ref reason } if reason == "SAFETY"));
  }

  #[tokio::test]
  async fn empty_lesson_is_invalid_request() {
    let gemini = client("http://127.0.0.1:9".into(), Some("k"));
    let err = gemini
      .generate_quiz(&Prompts::default(), &ImagePolicy::default(), "  ", "Bạn nhỏ")
      .await
      .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidRequest(_)));
  }

  #[test]
  fn malformed_json_is_rejected() {
    assert!(matches!(parse_quiz("Xin lỗi, tôi không thể"), Err(GenerationError::MalformedJson(_))));
    assert!(matches!(parse_quiz(r#"{"title":"x"}"#), Err(GenerationError::MalformedJson(_))));
  }

  #[test]
  fn invalid_questions_are_rejected() {
    let mut quiz = sample_quiz(10);
    quiz.questions[3].id = quiz.questions[2].id;
    let text = serde_json::to_string(&quiz).unwrap();
    assert!(matches!(parse_quiz(&text), Err(GenerationError::InvalidQuiz { .. })));

    let mut quiz = sample_quiz(10);
    quiz.questions[0].kind = crate::domain::QuestionType::Matching;
    let text = serde_json::to_string(&quiz).unwrap();
    assert!(matches!(parse_quiz(&text), Err(GenerationError::InvalidQuiz { .. })));

    let mut quiz = sample_quiz(10);
    quiz.questions[0].options = None;
    let text = serde_json::to_string(&quiz).unwrap();
    assert!(matches!(parse_quiz(&text), Err(GenerationError::InvalidQuiz { .. })));
  }

  #[test]
  fn max_tokens_with_no_text_is_empty_response() {
    let body: GenerateContentResponse =
      serde_json::from_value(json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] })).unwrap();
    assert!(matches!(extract_text(body), Err(GenerationError::EmptyResponse)));
  }
}
