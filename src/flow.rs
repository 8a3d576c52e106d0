//! Quiz flow state machine.
//!
//! `update` is a pure transition from (flow, event) to a new flow plus an
//! optional follow-up action for the session to perform. The only action is
//! the generation call; its outcome comes back as `Event::QuizGenerated`.
//!
//! ```text
//! SelectingLesson --select--> GeneratingQuiz --ok--> TakingQuiz --next(last)--> ViewingResults
//!        ^                          |                                                |
//!        +----------err-------------+------------------restart-----------------------+
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::answer::{apply_input, Answer, AnswerInput};
use crate::domain::{AnswerMap, Question, Quiz};
use crate::error::{GenerationError, ValidationError};
use crate::grading::{grade, Report};
use crate::strings;

/// Coarse phase tag, used on the wire and in logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  SelectingLesson,
  GeneratingQuiz,
  TakingQuiz,
  ViewingResults,
}

/// In-progress attempt: the quiz, the current question and answers so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Attempt {
  pub quiz: Quiz,
  pub index: usize,
  pub answers: AnswerMap,
}

impl Attempt {
  fn new(quiz: Quiz) -> Self {
    Self { quiz, index: 0, answers: AnswerMap::new() }
  }

  pub fn current(&self) -> &Question {
    &self.quiz.questions[self.index]
  }

  pub fn current_answer(&self) -> Option<&Answer> {
    self.answers.get(&self.current().id)
  }

  pub fn is_last(&self) -> bool {
    self.index + 1 == self.quiz.questions.len()
  }

  /// `(position, total)` with a 1-based position.
  pub fn progress(&self) -> (usize, usize) {
    (self.index + 1, self.quiz.questions.len())
  }
}

/// Finished attempt, graded once on entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Review {
  pub quiz: Quiz,
  pub answers: AnswerMap,
  pub report: Report,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuizFlow {
  SelectingLesson { error: Option<String> },
  GeneratingQuiz { lesson: String },
  TakingQuiz(Attempt),
  ViewingResults(Review),
}

impl Default for QuizFlow {
  fn default() -> Self {
    QuizFlow::SelectingLesson { error: None }
  }
}

impl QuizFlow {
  pub fn phase(&self) -> Phase {
    match self {
      QuizFlow::SelectingLesson { .. } => Phase::SelectingLesson,
      QuizFlow::GeneratingQuiz { .. } => Phase::GeneratingQuiz,
      QuizFlow::TakingQuiz(_) => Phase::TakingQuiz,
      QuizFlow::ViewingResults(_) => Phase::ViewingResults,
    }
  }
}

#[derive(Debug)]
pub enum Event {
  SelectLesson(String),
  QuizGenerated(Result<Quiz, GenerationError>),
  Answer { question_id: u32, input: AnswerInput },
  Next,
  Restart,
}

impl Event {
  fn name(&self) -> &'static str {
    match self {
      Event::SelectLesson(_) => "select_lesson",
      Event::QuizGenerated(_) => "quiz_generated",
      Event::Answer { .. } => "answer",
      Event::Next => "next",
      Event::Restart => "restart",
    }
  }
}

/// Work the session must perform after an update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowAction {
  /// Call the generation client and feed the outcome back as `QuizGenerated`.
  Generate { lesson: String },
}

/// Result of processing an event.
#[derive(Debug, Default, PartialEq)]
pub struct FlowUpdate {
  /// Whether the visible state changed.
  pub changed: bool,
  pub action: Option<FlowAction>,
  /// Blocking notice for the student; the state is unchanged.
  pub rejected: Option<ValidationError>,
}

impl FlowUpdate {
  pub fn none() -> Self {
    Self::default()
  }

  pub fn changed() -> Self {
    Self { changed: true, ..Self::default() }
  }

  pub fn action(action: FlowAction) -> Self {
    Self { changed: true, action: Some(action), rejected: None }
  }

  pub fn rejected(error: ValidationError) -> Self {
    Self { rejected: Some(error), ..Self::default() }
  }
}

/// Process one event. Events that make no sense in the current phase are
/// ignored and leave the flow untouched.
pub fn update(flow: QuizFlow, event: Event) -> (QuizFlow, FlowUpdate) {
  let phase = flow.phase();
  match (flow, event) {
    (QuizFlow::SelectingLesson { .. }, Event::SelectLesson(lesson)) => {
      debug!(target: "quiz", %lesson, "Lesson selected");
      let action = FlowAction::Generate { lesson: lesson.clone() };
      (QuizFlow::GeneratingQuiz { lesson }, FlowUpdate::action(action))
    }

    (QuizFlow::GeneratingQuiz { .. }, Event::QuizGenerated(Ok(quiz))) => {
      (QuizFlow::TakingQuiz(Attempt::new(quiz)), FlowUpdate::changed())
    }

    (QuizFlow::GeneratingQuiz { lesson }, Event::QuizGenerated(Err(e))) => {
      warn!(target: "quiz", %lesson, error = %e, "Quiz generation failed; back to lesson selection");
      let flow = QuizFlow::SelectingLesson { error: Some(strings::GENERATION_FAILED.into()) };
      (flow, FlowUpdate::changed())
    }

    (QuizFlow::TakingQuiz(mut attempt), Event::Answer { question_id, input }) => {
      if attempt.current().id != question_id {
        debug!(target: "quiz", question_id, current = attempt.current().id, "Ignoring answer for a question not on screen");
        return (QuizFlow::TakingQuiz(attempt), FlowUpdate::none());
      }
      match apply_input(attempt.current(), attempt.current_answer(), input) {
        Some(answer) => {
          attempt.answers.insert(question_id, answer);
          (QuizFlow::TakingQuiz(attempt), FlowUpdate::changed())
        }
        None => (QuizFlow::TakingQuiz(attempt), FlowUpdate::none()),
      }
    }

    (QuizFlow::TakingQuiz(mut attempt), Event::Next) => {
      if !Answer::is_answered(attempt.current_answer()) {
        return (QuizFlow::TakingQuiz(attempt), FlowUpdate::rejected(ValidationError::Unanswered));
      }
      if attempt.is_last() {
        let Attempt { quiz, answers, .. } = attempt;
        let report = grade(&quiz, &answers);
        return (QuizFlow::ViewingResults(Review { quiz, answers, report }), FlowUpdate::changed());
      }
      attempt.index += 1;
      (QuizFlow::TakingQuiz(attempt), FlowUpdate::changed())
    }

    (QuizFlow::ViewingResults(_), Event::Restart) => (QuizFlow::default(), FlowUpdate::changed()),

    (flow, event) => {
      debug!(target: "quiz", ?phase, event = event.name(), "Event ignored in this phase");
      (flow, FlowUpdate::none())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{correct_answer, sample_quiz};

  fn taking(quiz: Quiz) -> QuizFlow {
    let (flow, _) = update(QuizFlow::default(), Event::SelectLesson("Bài 1".into()));
    let (flow, _) = update(flow, Event::QuizGenerated(Ok(quiz)));
    flow
  }

  fn attempt(flow: &QuizFlow) -> &Attempt {
    match flow {
      QuizFlow::TakingQuiz(a) => a,
      other => panic!("expected TakingQuiz, got {:?}", other.phase()),
    }
  }

  fn answer_current(flow: QuizFlow, input: AnswerInput) -> QuizFlow {
    let id = attempt(&flow).current().id;
    update(flow, Event::Answer { question_id: id, input }).0
  }

  #[test]
  fn select_lesson_requests_generation() {
    let (flow, up) = update(QuizFlow::default(), Event::SelectLesson("Bài 8: Biểu đồ cột".into()));
    assert_eq!(flow, QuizFlow::GeneratingQuiz { lesson: "Bài 8: Biểu đồ cột".into() });
    assert_eq!(up.action, Some(FlowAction::Generate { lesson: "Bài 8: Biểu đồ cột".into() }));
  }

  #[test]
  fn no_second_generation_while_one_is_outstanding() {
    let (flow, _) = update(QuizFlow::default(), Event::SelectLesson("Bài 1".into()));
    let (flow, up) = update(flow, Event::SelectLesson("Bài 2".into()));
    assert_eq!(flow, QuizFlow::GeneratingQuiz { lesson: "Bài 1".into() });
    assert_eq!(up, FlowUpdate::none());
  }

  #[test]
  fn failed_generation_returns_to_selection_with_error() {
    let (flow, _) = update(QuizFlow::default(), Event::SelectLesson("Bài 1".into()));
    let err = GenerationError::WrongQuestionCount { expected: 10, actual: 9 };
    let (flow, up) = update(flow, Event::QuizGenerated(Err(err)));
    assert!(up.changed);
    assert_eq!(flow, QuizFlow::SelectingLesson { error: Some(strings::GENERATION_FAILED.into()) });
  }

  #[test]
  fn selecting_again_clears_the_error() {
    let flow = QuizFlow::SelectingLesson { error: Some("x".into()) };
    let (flow, _) = update(flow, Event::SelectLesson("Bài 1".into()));
    let (flow, _) = update(flow, Event::QuizGenerated(Err(GenerationError::EmptyResponse)));
    let (flow, _) = update(flow, Event::SelectLesson("Bài 1".into()));
    assert_eq!(flow.phase(), Phase::GeneratingQuiz);
  }

  #[test]
  fn next_without_answer_is_rejected() {
    let flow = taking(sample_quiz(10));
    let (flow, up) = update(flow, Event::Next);
    assert_eq!(up.rejected, Some(ValidationError::Unanswered));
    assert!(!up.changed);
    assert_eq!(attempt(&flow).index, 0);

    // Emptying a text answer counts as unanswered again.
    let mut flow = flow;
    for _ in 0..7 {
      let q = attempt(&flow).current().clone();
      flow = update(flow, Event::Answer { question_id: q.id, input: input_for(&q) }).0;
      flow = update(flow, Event::Next).0;
    }
    assert_eq!(attempt(&flow).current().id, 8);
    let flow = answer_current(flow, AnswerInput::Text(String::new()));
    let (flow, up) = update(flow, Event::Next);
    assert_eq!(up.rejected, Some(ValidationError::Unanswered));
    assert_eq!(attempt(&flow).progress(), (8, 10));
  }

  fn input_for(q: &Question) -> AnswerInput {
    match correct_answer(q) {
      Answer::Choice(s) => AnswerInput::Choose(s),
      Answer::Text(s) => AnswerInput::Text(s),
      Answer::Choices(v) => AnswerInput::Toggle(v[0].clone()),
    }
  }

  #[test]
  fn walking_every_question_reaches_results_in_order() {
    let quiz = sample_quiz(10);
    let mut flow = taking(quiz.clone());
    let mut visited = Vec::new();

    for step in 0..quiz.questions.len() {
      let a = attempt(&flow);
      assert_eq!(a.progress(), (step + 1, 10));
      visited.push(a.current().id);
      let q = a.current().clone();
      for input in match correct_answer(&q) {
        Answer::Choices(v) => v.into_iter().map(AnswerInput::Toggle).collect(),
        Answer::Choice(s) => vec![AnswerInput::Choose(s)],
        Answer::Text(s) => vec![AnswerInput::Text(s)],
      } {
        flow = update(flow, Event::Answer { question_id: q.id, input }).0;
      }
      flow = update(flow, Event::Next).0;
    }

    assert_eq!(visited, quiz.questions.iter().map(|q| q.id).collect::<Vec<_>>());
    match &flow {
      QuizFlow::ViewingResults(review) => {
        assert_eq!(review.report.total, 10);
        assert_eq!(review.report.score, 10);
        assert_eq!(review.answers.len(), 10);
      }
      other => panic!("expected results, got {:?}", other.phase()),
    }
  }

  #[test]
  fn single_choice_rapid_toggles_store_a_scalar() {
    let flow = taking(sample_quiz(10));
    let flow = answer_current(flow, AnswerInput::Toggle("a".into()));
    let flow = answer_current(flow, AnswerInput::Toggle("b".into()));
    let flow = answer_current(flow, AnswerInput::Toggle("c".into()));
    assert_eq!(attempt(&flow).current_answer(), Some(&Answer::Choice("c".into())));
  }

  #[test]
  fn stale_answers_are_ignored() {
    let flow = taking(sample_quiz(10));
    let (flow, up) = update(flow, Event::Answer { question_id: 5, input: AnswerInput::Toggle("a".into()) });
    assert_eq!(up, FlowUpdate::none());
    assert!(attempt(&flow).answers.is_empty());
  }

  #[test]
  fn restart_wipes_everything() {
    let mut quiz = sample_quiz(10);
    quiz.questions.truncate(1);
    let flow = taking(quiz);
    let flow = answer_current(flow, AnswerInput::Choose("b".into()));
    let (flow, _) = update(flow, Event::Next);
    assert_eq!(flow.phase(), Phase::ViewingResults);

    let (flow, up) = update(flow, Event::Restart);
    assert!(up.changed);
    assert_eq!(flow, QuizFlow::SelectingLesson { error: None });
  }

  #[test]
  fn restart_is_only_offered_from_results() {
    let flow = taking(sample_quiz(10));
    let (flow, up) = update(flow, Event::Restart);
    assert_eq!(flow.phase(), Phase::TakingQuiz);
    assert!(!up.changed);
  }
}
