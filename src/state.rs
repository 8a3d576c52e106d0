//! Application state shared by every connection: configuration and the
//! generation client. Immutable after startup, so no locking is needed;
//! per-student state lives in each WebSocket session.

use tracing::{info, instrument, warn};

use crate::config::{load_quiz_config_from_env, QuizConfig};
use crate::domain::Quiz;
use crate::error::GenerationError;
use crate::gemini::Gemini;

#[derive(Clone)]
pub struct AppState {
    pub config: QuizConfig,
    pub gemini: Gemini,
}

impl AppState {
    /// Build state from env: load config (or defaults) and init the Gemini client.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let config = load_quiz_config_from_env().unwrap_or_default();
        let gemini = Gemini::from_env(&config.generation);
        Self::with_parts(config, gemini)
    }

    pub fn with_parts(config: QuizConfig, gemini: Gemini) -> Self {
        info!(target: "quiz_tutor", lessons = config.lessons.len(), student = %config.student_name, "Lesson catalog ready");
        if gemini.has_api_key() {
            info!(target: "quiz_tutor", base_url = %gemini.base_url, model = %gemini.model, "Gemini enabled.");
        } else {
            warn!(target: "quiz_tutor", "GEMINI_API_KEY not set; quiz generation will fail until it is provided.");
        }
        Self { config, gemini }
    }

    /// Generate a quiz for `lesson` using the configured student name.
    pub async fn generate_quiz(&self, lesson: &str) -> Result<Quiz, GenerationError> {
        self.generate_quiz_for(lesson, &self.config.student_name).await
    }

    pub async fn generate_quiz_for(&self, lesson: &str, student_name: &str) -> Result<Quiz, GenerationError> {
        self.gemini
            .generate_quiz(&self.config.prompts, &self.config.images, lesson, student_name)
            .await
    }
}
