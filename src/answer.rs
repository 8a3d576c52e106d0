//! Student answers and how input events change them.
//!
//! The shape of an [`Answer`] follows the question type:
//!   - single choice / true-false -> `Choice`
//!   - multiple choice            -> `Choices` (ordered, unique)
//!   - fill-in-blank / open-ended -> `Text`

use serde::{Deserialize, Serialize};

use crate::domain::{Question, QuestionType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
  Choice(String),
  Choices(Vec<String>),
  Text(String),
}

impl Answer {
  /// Missing, empty text and empty selections all count as unanswered.
  pub fn is_answered(answer: Option<&Answer>) -> bool {
    match answer {
      None => false,
      Some(Answer::Choice(s)) | Some(Answer::Text(s)) => !s.is_empty(),
      Some(Answer::Choices(v)) => !v.is_empty(),
    }
  }

  /// Human readable form used in the review, `None` when unanswered.
  pub fn display(answer: Option<&Answer>) -> Option<String> {
    if !Answer::is_answered(answer) {
      return None;
    }
    answer.map(|a| match a {
      Answer::Choice(s) | Answer::Text(s) => s.clone(),
      Answer::Choices(v) => v.join(", "),
    })
  }
}

/// Raw interaction reported by a rendered input control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerInput {
  /// Radio-style selection.
  Choose(String),
  /// Checkbox-style toggle.
  Toggle(String),
  /// Current contents of a text field.
  Text(String),
}

/// Compute the new answer for `question` after `input`.
///
/// Returns `None` when the input does not apply to this question type
/// (e.g. text typed into a choice question, or an option that does not exist).
pub fn apply_input(question: &Question, current: Option<&Answer>, input: AnswerInput) -> Option<Answer> {
  match (question.kind, input) {
    (QuestionType::SingleChoice | QuestionType::TrueFalse, AnswerInput::Choose(o) | AnswerInput::Toggle(o)) => {
      question.choices().contains(&o.as_str()).then(|| Answer::Choice(o))
    }
    (QuestionType::MultiChoice, AnswerInput::Choose(o) | AnswerInput::Toggle(o)) => {
      if !question.choices().contains(&o.as_str()) {
        return None;
      }
      let mut selected = match current {
        Some(Answer::Choices(v)) => v.clone(),
        _ => Vec::new(),
      };
      toggle(&mut selected, o);
      Some(Answer::Choices(selected))
    }
    (QuestionType::FillInBlank | QuestionType::OpenEnded, AnswerInput::Text(s)) => Some(Answer::Text(s)),
    _ => None,
  }
}

/// Remove `option` if selected, otherwise append it.
fn toggle(selected: &mut Vec<String>, option: String) {
  if let Some(pos) = selected.iter().position(|s| *s == option) {
    selected.remove(pos);
  } else {
    selected.push(option);
  }
}
