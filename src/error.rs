//! Error types for quiz generation and the quiz flow.

use thiserror::Error;

/// A required setting is missing. Fails only the call that needed it.
#[derive(Debug, Error)]
pub enum ConfigurationError {
  #[error("API key is not set (expected {var})")]
  MissingApiKey { var: &'static str },
}

/// Anything that prevents a usable quiz from being produced.
#[derive(Debug, Error)]
pub enum GenerationError {
  #[error(transparent)]
  Configuration(#[from] ConfigurationError),

  #[error("invalid request: {0}")]
  InvalidRequest(String),

  #[error("request to model failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("model HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("model declined to answer: {reason}")]
  Declined { reason: String },

  #[error("model returned no text")]
  EmptyResponse,

  #[error("model output is not a valid quiz document: {0}")]
  MalformedJson(#[from] serde_json::Error),

  #[error("generated quiz has {actual} questions, expected {expected}")]
  WrongQuestionCount { expected: usize, actual: usize },

  #[error("generated quiz rejected: {reason}")]
  InvalidQuiz { reason: String },
}

/// Local, user-facing rejection while taking a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("current question has not been answered")]
  Unanswered,
}

impl ValidationError {
  pub fn notice(&self) -> &'static str {
    match self {
      ValidationError::Unanswered => crate::strings::ANSWER_REQUIRED,
    }
  }
}
