//! Cleaning of model-generated content before it is accepted.
//!
//! Rich-text fields keep formatting, lists, tables and their `class`
//! attributes; scripts, handlers and unknown tags are stripped.
//! Image URLs must be https and hosted on an allowed host.

use ammonia::Builder;
use tracing::warn;
use url::Url;

use crate::config::ImagePolicy;
use crate::domain::{Question, Quiz};

/// Sanitize an HTML fragment produced by the model.
pub fn clean_html(fragment: &str) -> String {
  let mut builder = Builder::default();
  builder.add_generic_attributes(&["class"]);
  builder.clean(fragment).to_string()
}

/// Keep `raw` only if it passes the image policy.
pub fn allowed_image_url(raw: &str, policy: &ImagePolicy) -> Option<String> {
  let url = Url::parse(raw.trim()).ok()?;
  if url.scheme() != "https" {
    return None;
  }
  let host = url.host_str()?.to_ascii_lowercase();
  let allowed = policy.allowed_hosts.iter().any(|h| {
    let h = h.to_ascii_lowercase();
    host == h || host.ends_with(&format!(".{h}"))
  });
  allowed.then(|| raw.trim().to_string())
}

fn clean_question(mut q: Question, policy: &ImagePolicy) -> Question {
  q.question_text = clean_html(&q.question_text);
  q.solution = clean_html(&q.solution);
  q.feedback = clean_html(&q.feedback);
  q.image_url = match q.image_url.take() {
    Some(raw) if !raw.trim().is_empty() => {
      let kept = allowed_image_url(&raw, policy);
      if kept.is_none() {
        warn!(target: "quiz", question_id = q.id, url = %raw, "Dropping image URL outside allow-list");
      }
      kept
    }
    _ => None,
  };
  q
}

/// Sanitize every rich-text field and image reference of a quiz.
pub fn clean_quiz(quiz: Quiz, policy: &ImagePolicy) -> Quiz {
  Quiz {
    title: quiz.title.trim().to_string(),
    questions: quiz.questions.into_iter().map(|q| clean_question(q, policy)).collect(),
  }
}
