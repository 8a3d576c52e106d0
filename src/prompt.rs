//! Quiz-generation directive and the structured-output schema sent with it.

use serde_json::{json, Value};

use crate::domain::{QuestionType, QUIZ_LENGTH};
use crate::util::fill_template;

pub const DEFAULT_QUIZ_TEMPLATE: &str = r#"
You are 'Gia sư AI', a patient and creative 4th grade math tutor in Vietnam.

Write a personalised worksheet for the student '{student_name}' on the lesson "{lesson_title}"
from the textbook 'Toán 4 - Chân trời sáng tạo'.

Rules:
1. Exactly {question_count} questions, with ids 1..{question_count}.
2. Difficulty: 40% recognition (recall of facts), 40% comprehension (simple application),
   20% application (multi-step or word problems).
3. Question types:
   - 2-3 of `multiple_choice_single`
   - 2-3 of `multiple_choice_multi`
   - 1-2 of `true_false` (correctAnswers is ["Đúng"] or ["Sai"])
   - 1-2 of `fill_in_the_blank`
   - 1-2 of `open_ended` (word problems solved step by step)
   Choice questions list every option in `options`; correctAnswers repeat option text exactly.
4. Everything (questions, options, solutions, feedback) is written in Vietnamese,
   in a warm and encouraging tone for a 4th grader.
5. `questionText`, `solution` and `feedback` are HTML: use <p>, <ul>, <li>, <strong>, <em>.
6. Tables are HTML, never markdown, with exactly this skeleton:
   <table class="w-full my-4 text-sm text-left border-collapse border border-slate-400"><thead><tr class="bg-slate-100"><th class="p-2 border border-slate-300 font-semibold text-slate-700">...</th></tr></thead><tbody><tr><td class="p-2 border border-slate-300 text-slate-800">...</td></tr></tbody></table>
7. Bar charts (biểu đồ cột) are images built with Image-Charts. Put the full URL in `imageUrl`:
   https://image-charts.com/chart?cht=bvg&chd=t:<data>&chxt=x,y&chxl=0:|<labels>&chs=400x250&chtt=<title>
   where <data> is like '10,20,15', <labels> like 'Lớp 4A|Lớp 4B|Lớp 4C', and every value is URL-encoded.
   Never write placeholders such as '[Image: ...]' in questionText.
8. Questions are shown one at a time. When several questions share a table, chart or story,
   repeat the whole context (full table, full imageUrl) inside each of them.
   Never write "Dựa vào biểu đồ ở câu trên".

Reply with a single JSON object only.
"#;

/// Fill the configured template for one lesson and student.
pub fn build_quiz_prompt(template: &str, lesson_title: &str, student_name: &str) -> String {
  let count = QUIZ_LENGTH.to_string();
  fill_template(
    template,
    &[
      ("student_name", student_name),
      ("lesson_title", lesson_title),
      ("question_count", &count),
    ],
  )
  .trim()
  .to_string()
}

/// Response schema in the provider's OpenAPI subset.
pub fn quiz_response_schema() -> Value {
  let types: Vec<&str> = QuestionType::GENERATED.iter().map(|t| t.as_str()).collect();
  json!({
    "type": "OBJECT",
    "properties": {
      "title": { "type": "STRING" },
      "questions": {
        "type": "ARRAY",
        "items": {
          "type": "OBJECT",
          "properties": {
            "id": { "type": "INTEGER" },
            "questionText": { "type": "STRING" },
            "imageUrl": {
              "type": "STRING",
              "description": "Optional chart or illustration URL.",
              "nullable": true
            },
            "type": { "type": "STRING", "enum": types },
            "options": {
              "type": "ARRAY",
              "items": { "type": "STRING" },
              "description": "Options for multiple choice questions."
            },
            "correctAnswers": {
              "type": "ARRAY",
              "items": { "type": "STRING" },
              "description": "All correct answers. For true/false use 'Đúng' or 'Sai'."
            },
            "solution": {
              "type": "STRING",
              "description": "Step-by-step solution in Vietnamese, formatted with HTML."
            },
            "feedback": {
              "type": "STRING",
              "description": "Short encouraging feedback for a wrong answer, formatted with HTML."
            }
          },
          "required": ["id", "questionText", "type", "correctAnswers", "solution", "feedback"]
        }
      }
    },
    "required": ["title", "questions"]
  })
}
