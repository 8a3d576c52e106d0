//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::answer::AnswerInput;
use crate::domain::{AnswerMap, Quiz};
use crate::flow::Phase;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    Lessons,
    SelectLesson {
        lesson: String,
    },
    Answer {
        #[serde(rename = "questionId")]
        question_id: u32,
        input: AnswerInput,
    },
    Next,
    Restart,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Lessons {
        lessons: Vec<String>,
    },
    /// Full replacement of the visible screen.
    View {
        phase: Phase,
        html: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        progress: Option<Progress>,
    },
    /// Blocking notice; the screen stays as it is.
    Notice {
        message: String,
    },
    Error {
        message: String,
    },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizIn {
    pub lesson: String,
    #[serde(default)]
    pub student_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GradeIn {
    pub quiz: Quiz,
    #[serde(default)]
    pub answers: AnswerMap,
}

#[derive(Serialize)]
pub struct LessonsOut {
    pub lessons: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub generation_enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::Answer;

    #[test]
    fn client_messages_parse() {
        let m: ClientWsMessage = serde_json::from_str(
            r#"{"type":"answer","questionId":4,"input":{"kind":"toggle","value":"c"}}"#,
        )
        .unwrap();
        assert!(matches!(
            m,
            ClientWsMessage::Answer { question_id: 4, input: AnswerInput::Toggle(ref v) } if v == "c"
        ));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"select_lesson","lesson":"Bài 1"}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::SelectLesson { .. }));
    }

    #[test]
    fn grade_request_accepts_string_keyed_answers() {
        let quiz = serde_json::to_value(crate::testing::sample_quiz(10)).unwrap();
        let body = serde_json::json!({
            "quiz": quiz,
            "answers": { "1": { "kind": "choice", "value": "a" }, "4": { "kind": "choices", "value": ["c", "a"] } }
        });
        let g: GradeIn = serde_json::from_value(body).unwrap();
        assert_eq!(g.answers.get(&4), Some(&Answer::Choices(vec!["c".into(), "a".into()])));
    }

    #[test]
    fn view_serialization_skips_missing_progress() {
        let v = serde_json::to_value(ServerWsMessage::View {
            phase: Phase::SelectingLesson,
            html: "<div></div>".into(),
            progress: None,
        })
        .unwrap();
        assert_eq!(v["type"], "view");
        assert_eq!(v["phase"], "selecting_lesson");
        assert!(v.get("progress").is_none());
    }
}
