//! Shared fixtures for unit tests.

use serde_json::{json, Value};

use crate::answer::Answer;
use crate::domain::{Question, QuestionType, Quiz};

fn question(id: u32) -> Question {
  let (kind, options, correct): (QuestionType, Option<Vec<&str>>, Vec<&str>) = match id {
    1..=3 => (QuestionType::SingleChoice, Some(vec!["a", "b", "c", "d"]), vec!["a"]),
    4 | 5 => (QuestionType::MultiChoice, Some(vec!["a", "b", "c", "d"]), vec!["a", "c"]),
    6 | 7 => (QuestionType::TrueFalse, None, vec!["Đúng"]),
    8 | 9 => (QuestionType::FillInBlank, None, vec!["125"]),
    _ => (QuestionType::OpenEnded, None, vec!["42"]),
  };
  Question {
    id,
    question_text: format!("<p>Câu hỏi số <strong>{id}</strong></p>"),
    kind,
    options: options.map(|o| o.into_iter().map(String::from).collect()),
    image_url: None,
    correct_answers: correct.into_iter().map(String::from).collect(),
    solution: format!("<p>Lời giải {id}</p>"),
    feedback: format!("<p>Gợi ý {id}</p>"),
  }
}

/// A quiz with `n` questions covering every generated type.
pub fn sample_quiz(n: u32) -> Quiz {
  Quiz { title: "Ôn tập Toán 4".into(), questions: (1..=n).map(question).collect() }
}

/// The answer that grades correct for `q`.
pub fn correct_answer(q: &Question) -> Answer {
  match q.kind {
    QuestionType::MultiChoice => Answer::Choices(q.correct_answers.clone()),
    QuestionType::FillInBlank | QuestionType::OpenEnded => Answer::Text(q.correct_answers[0].clone()),
    _ => Answer::Choice(q.correct_answers[0].clone()),
  }
}

/// Provider envelope wrapping `text` as the first candidate.
pub fn provider_envelope(text: &str) -> Value {
  json!({
    "candidates": [{
      "content": { "role": "model", "parts": [{ "text": text }] },
      "finishReason": "STOP"
    }],
    "usageMetadata": { "promptTokenCount": 812, "candidatesTokenCount": 2400, "totalTokenCount": 3212 }
  })
}
