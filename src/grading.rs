//! Grading of a finished attempt: per-question correctness, score and tier.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::answer::Answer;
use crate::domain::{AnswerMap, Question, QuestionResult, Quiz};
use crate::strings;

/// Score band that selects the closing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
  Excellent,
  Good,
  KeepPracticing,
}

impl Tier {
  pub fn for_score(score: usize) -> Self {
    if score > 8 {
      Tier::Excellent
    } else if score > 5 {
      Tier::Good
    } else {
      Tier::KeepPracticing
    }
  }

  pub fn message(self) -> &'static str {
    match self {
      Tier::Excellent => strings::TIER_EXCELLENT,
      Tier::Good => strings::TIER_GOOD,
      Tier::KeepPracticing => strings::TIER_KEEP_PRACTICING,
    }
  }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
  pub results: Vec<QuestionResult>,
  pub score: usize,
  pub total: usize,
  pub tier: Tier,
}

/// True when `answer` matches the expected answers of `question`.
///
/// Multi-answer questions (or list answers) compare as sets, everything else
/// is exact equality with the first correct answer.
pub fn is_correct(question: &Question, answer: Option<&Answer>) -> bool {
  let Some(answer) = answer else { return false };
  let expected = &question.correct_answers;

  match answer {
    Answer::Choices(given) => same_elements(given, expected),
    Answer::Choice(given) | Answer::Text(given) if expected.len() > 1 => {
      same_elements(std::slice::from_ref(given), expected)
    }
    Answer::Choice(given) | Answer::Text(given) => expected.first() == Some(given),
  }
}

fn same_elements(given: &[String], expected: &[String]) -> bool {
  if given.len() != expected.len() {
    return false;
  }
  let mut a: Vec<&str> = given.iter().map(String::as_str).collect();
  let mut b: Vec<&str> = expected.iter().map(String::as_str).collect();
  a.sort_unstable();
  b.sort_unstable();
  a == b
}

/// Grade every question of `quiz` against `answers`.
#[instrument(level = "debug", skip_all, fields(questions = quiz.questions.len(), answered = answers.len()))]
pub fn grade(quiz: &Quiz, answers: &AnswerMap) -> Report {
  let results: Vec<QuestionResult> = quiz
    .questions
    .iter()
    .map(|q| {
      let answer = answers.get(&q.id).cloned();
      let is_correct = is_correct(q, answer.as_ref());
      QuestionResult { question: q.clone(), answer, is_correct }
    })
    .collect();

  let score = results.iter().filter(|r| r.is_correct).count();
  let tier = Tier::for_score(score);
  debug!(target: "quiz", score, total = results.len(), ?tier, "Quiz graded");

  Report { total: results.len(), results, score, tier }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuestionType;

  fn q(id: u32, kind: QuestionType, correct: &[&str]) -> Question {
    Question {
      id,
      question_text: format!("<p>Câu {id}</p>"),
      kind,
      options: Some(vec!["a".into(), "b".into(), "c".into()]),
      image_url: None,
      correct_answers: correct.iter().map(|s| s.to_string()).collect(),
      solution: "<p>Lời giải</p>".into(),
      feedback: "<p>Gợi ý</p>".into(),
    }
  }

  fn choices(v: &[&str]) -> Answer {
    Answer::Choices(v.iter().map(|s| s.to_string()).collect())
  }

  #[test]
  fn multi_answer_grading_ignores_order() {
    let question = q(1, QuestionType::MultiChoice, &["a", "b"]);
    assert!(is_correct(&question, Some(&choices(&["a", "b"]))));
    assert!(is_correct(&question, Some(&choices(&["b", "a"]))));
    assert!(!is_correct(&question, Some(&choices(&["a"]))));
    assert!(!is_correct(&question, Some(&choices(&["a", "b", "c"]))));
  }

  #[test]
  fn list_answer_against_single_correct_answer() {
    let question = q(1, QuestionType::MultiChoice, &["c"]);
    assert!(is_correct(&question, Some(&choices(&["c"]))));
    assert!(!is_correct(&question, Some(&choices(&["c", "a"]))));
  }

  #[test]
  fn single_answer_is_exact_equality() {
    let question = q(1, QuestionType::TrueFalse, &["Đúng"]);
    assert!(!is_correct(&question, Some(&Answer::Choice("Sai".into()))));
    assert!(is_correct(&question, Some(&Answer::Choice("Đúng".into()))));

    let blank = q(2, QuestionType::FillInBlank, &["125"]);
    assert!(!is_correct(&blank, Some(&Answer::Text("125 ".into()))));
    assert!(!is_correct(&blank, None));
  }

  #[test]
  fn tier_boundaries() {
    assert_eq!(Tier::for_score(10), Tier::Excellent);
    assert_eq!(Tier::for_score(9), Tier::Excellent);
    assert_eq!(Tier::for_score(8), Tier::Good);
    assert_eq!(Tier::for_score(6), Tier::Good);
    assert_eq!(Tier::for_score(5), Tier::KeepPracticing);
    assert_eq!(Tier::for_score(0), Tier::KeepPracticing);
  }

  #[test]
  fn grade_counts_correct_results() {
    let quiz = Quiz {
      title: "Ôn tập".into(),
      questions: vec![
        q(1, QuestionType::SingleChoice, &["a"]),
        q(2, QuestionType::MultiChoice, &["a", "c"]),
        q(3, QuestionType::OpenEnded, &["42"]),
      ],
    };
    let mut answers = AnswerMap::new();
    answers.insert(1, Answer::Choice("a".into()));
    answers.insert(2, choices(&["c", "a"]));

    let report = grade(&quiz, &answers);
    assert_eq!(report.total, 3);
    assert_eq!(report.score, 2);
    assert_eq!(report.tier, Tier::KeepPracticing);
    assert!(!report.results[2].is_correct);
    assert_eq!(report.results[2].answer, None);
  }
}
