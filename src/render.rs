//! HTML fragments for every phase of the flow (maud).
//!
//! Inputs carry `data-*` attributes the browser shell turns into WebSocket
//! messages: `data-action` for buttons, `data-question-id` plus
//! `data-kind` (`choose` | `toggle` | `text`) for answer controls.
//!
//! Rich-text fields were sanitized when the quiz was accepted and are emitted
//! as markup; everything else is escaped.

use maud::{html, Markup, PreEscaped};

use crate::answer::Answer;
use crate::domain::{Question, QuestionType};
use crate::flow::{Attempt, QuizFlow, Review};
use crate::strings;

/// Render whatever the flow currently shows.
pub fn render_flow(flow: &QuizFlow, lessons: &[String]) -> Markup {
  match flow {
    QuizFlow::SelectingLesson { error } => lesson_selector(lessons, error.as_deref()),
    QuizFlow::GeneratingQuiz { .. } => loading(),
    QuizFlow::TakingQuiz(attempt) => quiz_view(attempt),
    QuizFlow::ViewingResults(review) => results_view(review),
  }
}

pub fn lesson_selector(lessons: &[String], error: Option<&str>) -> Markup {
  html! {
    div class="w-full max-w-4xl mx-auto p-6" {
      @if let Some(message) = error {
        div class="p-4 mb-4 bg-red-100 text-red-700 border border-red-300 rounded-lg" role="alert" { (message) }
      }
      div class="text-center mb-8" {
        h1 class="text-4xl font-bold text-green-800" { (strings::APP_HEADING) }
        p class="text-lg text-gray-600 mt-2" { (strings::APP_SUBHEADING) }
      }
      div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4" {
        @for lesson in lessons {
          button class="lesson bg-white p-4 rounded-lg shadow-md text-left font-semibold"
                 data-action="select_lesson" data-lesson=(lesson) {
            (lesson)
          }
        }
      }
    }
  }
}

pub fn loading() -> Markup {
  html! {
    div class="flex flex-col items-center justify-center space-y-4" {
      div class="spinner w-16 h-16 border-4 border-dashed rounded-full animate-spin border-green-500" {}
      p class="text-lg text-green-700 font-semibold" { (strings::LOADING) }
    }
  }
}

fn quiz_view(attempt: &Attempt) -> Markup {
  let (position, total) = attempt.progress();
  let percent = position * 100 / total.max(1);
  html! {
    div class="w-full max-w-3xl mx-auto p-4" {
      h2 class="text-3xl font-bold text-center text-green-800 mb-2" { (attempt.quiz.title) }
      p class="text-center text-gray-600 mb-4" { (strings::PROGRESS_LABEL) " " (position) "/" (total) }
      div class="w-full bg-gray-200 rounded-full h-2.5 mb-8" {
        div class="bg-green-500 h-2.5 rounded-full" style=(format!("width: {percent}%")) {}
      }
      (question_card(attempt.current(), position, attempt.current_answer()))
      div class="text-center mt-8" {
        button class="bg-green-600 text-white font-bold py-3 px-10 rounded-lg" data-action="next" {
          @if attempt.is_last() { (strings::SUBMIT) } @else { (strings::NEXT) }
        }
      }
    }
  }
}

/// One question with the input control matching its type.
pub fn question_card(question: &Question, number: usize, answer: Option<&Answer>) -> Markup {
  html! {
    div class="question bg-white p-6 rounded-xl shadow-lg mb-6" data-question-id=(question.id) {
      div class="text-lg font-semibold text-gray-800 mb-4" {
        p class="text-blue-600 font-bold mb-2" { (strings::QUESTION_LABEL) " " (number) ":" }
        div class="font-normal" { (PreEscaped(&question.question_text)) }
      }
      @if let Some(src) = &question.image_url {
        div class="my-4 flex justify-center" {
          img src=(src) alt=(format!("{} {}", strings::IMAGE_ALT, number)) class="rounded-lg max-w-full h-auto max-h-60";
        }
      }
      div class="space-y-3" { (answer_control(question, answer)) }
    }
  }
}

fn answer_control(question: &Question, answer: Option<&Answer>) -> Markup {
  let name = format!("question-{}", question.id);
  match question.kind {
    QuestionType::SingleChoice | QuestionType::TrueFalse => {
      let selected = match answer {
        Some(Answer::Choice(s)) => Some(s.as_str()),
        _ => None,
      };
      html! {
        @for option in question.choices() {
          label class="option flex items-center space-x-3 p-3 rounded-lg border border-gray-200 cursor-pointer" {
            input type="radio" name=(name) value=(option) checked[selected == Some(option)]
                  data-question-id=(question.id) data-kind="choose";
            span class="text-gray-800" { (option) }
          }
        }
      }
    }
    QuestionType::MultiChoice => {
      let selected: &[String] = match answer {
        Some(Answer::Choices(v)) => v,
        _ => &[],
      };
      html! {
        @for option in question.choices() {
          label class="option flex items-center space-x-3 p-3 rounded-lg border border-gray-200 cursor-pointer" {
            input type="checkbox" value=(option) checked[selected.iter().any(|s| s == option)]
                  data-question-id=(question.id) data-kind="toggle";
            span class="text-gray-800" { (option) }
          }
        }
      }
    }
    QuestionType::FillInBlank => html! {
      input type="text" value=(text_of(answer)) placeholder=(strings::FILL_PLACEHOLDER)
            class="mt-2 p-2 border border-gray-300 rounded-md w-full"
            data-question-id=(question.id) data-kind="text";
    },
    QuestionType::OpenEnded => html! {
      textarea rows="4" placeholder=(strings::OPEN_PLACEHOLDER)
               class="mt-2 p-2 border border-gray-300 rounded-md w-full"
               data-question-id=(question.id) data-kind="text" { (text_of(answer)) }
    },
    QuestionType::Matching => html! {
      p class="text-gray-500 italic" { (strings::UNSUPPORTED_QUESTION) }
    },
  }
}

fn text_of(answer: Option<&Answer>) -> &str {
  match answer {
    Some(Answer::Text(s)) => s,
    _ => "",
  }
}

/// Review text for an answer, or the "not answered" placeholder.
pub fn answer_text(answer: Option<&Answer>) -> String {
  Answer::display(answer).unwrap_or_else(|| strings::NOT_ANSWERED.to_string())
}

fn results_view(review: &Review) -> Markup {
  let report = &review.report;
  html! {
    div class="w-full max-w-4xl mx-auto p-4" {
      div class="summary bg-white p-8 rounded-2xl shadow-xl text-center mb-8" {
        h2 class="text-4xl font-bold text-green-700" { (strings::RESULTS_HEADING) }
        p class="score text-6xl font-bold text-blue-600 my-4" { (report.score) " / " (report.total) }
        p class="tier text-xl text-gray-600" { (report.tier.message()) }
      }
      h3 class="text-2xl font-semibold text-gray-800 mb-6" { (strings::REVIEW_HEADING) }
      @for (index, result) in report.results.iter().enumerate() {
        @let q = &result.question;
        @let tone = if result.is_correct { "correct bg-green-50 border-green-500" } else { "incorrect bg-red-50 border-red-500" };
        div class=(format!("result p-6 rounded-xl shadow-md mb-6 border-l-4 {tone}")) {
          div class="text-lg font-semibold text-gray-800 mb-3" {
            p class="font-bold mb-2" { (strings::QUESTION_LABEL) " " (index + 1) ":" }
            div class="font-normal" { (PreEscaped(&q.question_text)) }
          }
          @if let Some(src) = &q.image_url {
            div class="my-3 flex justify-center" {
              img src=(src) alt=(format!("{} {}", strings::IMAGE_ALT, index + 1)) class="rounded-lg max-w-xs h-auto";
            }
          }
          div class="text-base space-y-3 mt-4" {
            p {
              strong { (strings::YOUR_ANSWER) }
              span class="given font-bold ml-2" { (answer_text(result.answer.as_ref())) }
            }
            @if !result.is_correct {
              p {
                strong { (strings::CORRECT_ANSWER) }
                span class="expected font-bold ml-2 text-green-800" { (q.correct_answers.join(", ")) }
              }
              div class="feedback mt-4 p-4 bg-yellow-100 rounded-lg border border-yellow-300" {
                p class="font-semibold text-yellow-900" { (strings::FEEDBACK_HEADING) }
                div class="text-yellow-800" { (PreEscaped(&q.feedback)) }
              }
            }
            div class="solution mt-4 p-4 bg-blue-100 rounded-lg border border-blue-200" {
              p class="font-semibold text-blue-900" { (strings::SOLUTION_HEADING) }
              div class="text-blue-800" { (PreEscaped(&q.solution)) }
            }
          }
        }
      }
      div class="text-center mt-10" {
        button class="bg-blue-600 text-white font-bold py-3 px-10 rounded-lg" data-action="restart" {
          (strings::RESTART)
        }
      }
    }
  }
}
