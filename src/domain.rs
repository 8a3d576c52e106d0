//! Domain models: quiz, question, question types and the graded result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::answer::Answer;

/// Every generated quiz carries exactly this many questions.
pub const QUIZ_LENGTH: usize = 10;

/// Answer-capture shape a question requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
  #[serde(rename = "multiple_choice_single")]
  SingleChoice,
  #[serde(rename = "multiple_choice_multi")]
  MultiChoice,
  TrueFalse,
  #[serde(rename = "fill_in_the_blank")]
  FillInBlank,
  /// Declared by the content format but never rendered or graded.
  Matching,
  OpenEnded,
}

impl QuestionType {
  /// Types the model is allowed to produce. `Matching` is left out on purpose.
  pub const GENERATED: [QuestionType; 5] = [
    QuestionType::SingleChoice,
    QuestionType::MultiChoice,
    QuestionType::TrueFalse,
    QuestionType::FillInBlank,
    QuestionType::OpenEnded,
  ];

  /// Wire name used in the response schema.
  pub fn as_str(self) -> &'static str {
    match self {
      QuestionType::SingleChoice => "multiple_choice_single",
      QuestionType::MultiChoice => "multiple_choice_multi",
      QuestionType::TrueFalse => "true_false",
      QuestionType::FillInBlank => "fill_in_the_blank",
      QuestionType::Matching => "matching",
      QuestionType::OpenEnded => "open_ended",
    }
  }

  pub fn needs_options(self) -> bool {
    matches!(self, QuestionType::SingleChoice | QuestionType::MultiChoice)
  }
}

/// Fixed option set for true/false questions, whatever the question declares.
pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["Đúng", "Sai"];

/// One generated question. Immutable once accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
  pub id: u32,
  /// HTML fragment.
  pub question_text: String,
  #[serde(rename = "type")]
  pub kind: QuestionType,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_url: Option<String>,
  pub correct_answers: Vec<String>,
  /// HTML fragment.
  pub solution: String,
  /// HTML fragment shown for incorrect attempts.
  pub feedback: String,
}

impl Question {
  /// Options the student can actually pick from.
  pub fn choices(&self) -> Vec<&str> {
    match self.kind {
      QuestionType::TrueFalse => TRUE_FALSE_OPTIONS.to_vec(),
      _ => self
        .options
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(String::as_str)
        .collect(),
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
  pub title: String,
  pub questions: Vec<Question>,
}

/// Student answers keyed by question id.
pub type AnswerMap = BTreeMap<u32, Answer>;

/// Graded outcome for one question.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
  pub question: Question,
  pub answer: Option<Answer>,
  pub is_correct: bool,
}
