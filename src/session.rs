//! One student's quiz session, owned by a single WebSocket connection.
//!
//! Client messages become flow events; flow updates become server messages.
//! The generation call is not made here: `handle` hands the action back to
//! the connection loop, which awaits it and reports through `complete`.

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::Quiz;
use crate::error::GenerationError;
use crate::flow::{update, Event, FlowAction, FlowUpdate, QuizFlow};
use crate::lessons::is_known;
use crate::protocol::{ClientWsMessage, Progress, ServerWsMessage};
use crate::render::render_flow;
use crate::strings;

/// Replies to send right away, plus work to do before the next message.
#[derive(Debug, Default)]
pub struct Step {
  pub replies: Vec<ServerWsMessage>,
  pub action: Option<FlowAction>,
}

pub struct Session {
  pub id: Uuid,
  flow: QuizFlow,
  lessons: Vec<String>,
}

impl Session {
  pub fn new(lessons: Vec<String>) -> Self {
    Self { id: Uuid::new_v4(), flow: QuizFlow::default(), lessons }
  }

  #[cfg(test)]
  pub fn flow(&self) -> &QuizFlow {
    &self.flow
  }

  /// Current screen as a `view` message.
  pub fn view(&self) -> ServerWsMessage {
    let progress = match &self.flow {
      QuizFlow::TakingQuiz(attempt) => {
        let (current, total) = attempt.progress();
        Some(Progress { current, total })
      }
      _ => None,
    };
    ServerWsMessage::View {
      phase: self.flow.phase(),
      html: render_flow(&self.flow, &self.lessons).into_string(),
      progress,
    }
  }

  fn apply(&mut self, event: Event) -> FlowUpdate {
    let flow = std::mem::take(&mut self.flow);
    let (flow, up) = update(flow, event);
    self.flow = flow;
    up
  }

  #[instrument(level = "debug", skip(self), fields(session = %self.id, phase = ?self.flow.phase()))]
  pub fn handle(&mut self, msg: ClientWsMessage) -> Step {
    let mut step = Step::default();
    match msg {
      ClientWsMessage::Ping => step.replies.push(ServerWsMessage::Pong),

      ClientWsMessage::Lessons => {
        step.replies.push(ServerWsMessage::Lessons { lessons: self.lessons.clone() })
      }

      ClientWsMessage::SelectLesson { lesson } => {
        if !is_known(&self.lessons, &lesson) {
          debug!(target: "quiz", %lesson, "Rejected lesson outside the catalog");
          step.replies.push(ServerWsMessage::Error { message: strings::UNKNOWN_LESSON.into() });
          return step;
        }
        let up = self.apply(Event::SelectLesson(lesson));
        if up.changed {
          step.replies.push(self.view());
        }
        step.action = up.action;
      }

      ClientWsMessage::Answer { question_id, input } => {
        // The browser control already shows accepted input; only resync on refusal.
        let up = self.apply(Event::Answer { question_id, input });
        if !up.changed {
          step.replies.push(self.view());
        }
      }

      ClientWsMessage::Next => {
        let up = self.apply(Event::Next);
        if let Some(e) = up.rejected {
          step.replies.push(ServerWsMessage::Notice { message: e.notice().into() });
        } else if up.changed {
          step.replies.push(self.view());
        }
      }

      ClientWsMessage::Restart => {
        if self.apply(Event::Restart).changed {
          step.replies.push(self.view());
        }
      }
    }
    step
  }

  /// Feed back the outcome of a `Generate` action.
  #[instrument(level = "debug", skip(self, result), fields(session = %self.id, ok = result.is_ok()))]
  pub fn complete(&mut self, result: Result<Quiz, GenerationError>) -> Vec<ServerWsMessage> {
    let up = self.apply(Event::QuizGenerated(result));
    info!(target: "quiz", session = %self.id, phase = ?self.flow.phase(), "Generation finished");
    if up.changed { vec![self.view()] } else { Vec::new() }
  }
}
