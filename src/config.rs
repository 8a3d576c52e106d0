//! Loading app configuration (student name, lesson catalog, generation knobs,
//! image allow-list and prompt) from TOML.
//!
//! Every section is optional; anything missing falls back to the defaults below.

use serde::Deserialize;
use tracing::{error, info};

use crate::lessons::default_lessons;
use crate::prompt::DEFAULT_QUIZ_TEMPLATE;

#[derive(Clone, Debug, Deserialize)]
pub struct QuizConfig {
  #[serde(default = "default_student_name")]
  pub student_name: String,
  #[serde(default = "default_lessons")]
  pub lessons: Vec<String>,
  #[serde(default)]
  pub generation: GenerationSettings,
  #[serde(default)]
  pub images: ImagePolicy,
  #[serde(default)]
  pub prompts: Prompts,
}

impl Default for QuizConfig {
  fn default() -> Self {
    Self {
      student_name: default_student_name(),
      lessons: default_lessons(),
      generation: GenerationSettings::default(),
      images: ImagePolicy::default(),
      prompts: Prompts::default(),
    }
  }
}

fn default_student_name() -> String {
  "Bạn nhỏ".into()
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
  pub temperature: f32,
  pub timeout_secs: u64,
}

impl Default for GenerationSettings {
  fn default() -> Self {
    Self { temperature: 0.7, timeout_secs: 90 }
  }
}

/// Which image URLs produced by the model are allowed through.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ImagePolicy {
  pub allowed_hosts: Vec<String>,
}

impl Default for ImagePolicy {
  fn default() -> Self {
    Self { allowed_hosts: vec!["image-charts.com".into()] }
  }
}

/// Prompt used by the generation client. Placeholders:
/// `{student_name}`, `{lesson_title}`, `{question_count}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub quiz_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self { quiz_template: DEFAULT_QUIZ_TEMPLATE.into() }
  }
}

/// Parse a TOML document into a config.
pub fn parse_config(s: &str) -> Result<QuizConfig, toml::de::Error> {
  toml::from_str::<QuizConfig>(s)
}

/// Attempt to load `QuizConfig` from QUIZ_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_quiz_config_from_env() -> Option<QuizConfig> {
  let path = std::env::var("QUIZ_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "quiz_tutor", %path, lessons = cfg.lessons.len(), "Loaded quiz config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quiz_tutor", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quiz_tutor", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
