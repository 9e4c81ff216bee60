use serde_json::{json, Map, Value};

use crate::models::question::QuestionType;
use crate::models::test::TestContent;

/// Fills the canonical content fields for a question's declared type, so
/// consumers can rely on a stable field set. Existing values win; the
/// primary text field is salvaged from its legacy alias (`question` vs
/// `statement` depending on document origin) before defaulting to empty.
/// Unknown types and non-object inputs are returned unchanged.
pub fn normalize_question(question: &Value) -> Value {
    let Some(obj) = question.as_object() else {
        return question.clone();
    };
    let Some(question_type) = obj
        .get("type")
        .and_then(Value::as_str)
        .and_then(QuestionType::from_tag)
    else {
        return question.clone();
    };

    let mut content = obj
        .get("content")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    fill_content(question_type, &mut content);

    let mut out = obj.clone();
    out.insert("content".to_string(), Value::Object(content));
    Value::Object(out)
}

/// Maps [`normalize_question`] over a question list. Non-list input yields
/// an empty list.
pub fn normalize_questions(questions: &Value) -> Vec<Value> {
    match questions.as_array() {
        Some(list) => list.iter().map(normalize_question).collect(),
        None => Vec::new(),
    }
}

/// Read-path helper: normalizes every question list reachable from either
/// shape (reading/listening sections and speaking parts; writing tasks carry
/// no question lists).
pub fn normalize_content_questions(content: &mut TestContent) {
    if let Some(list) = content.reading_sections.as_mut() {
        normalize_question_holders(list);
    }
    if let Some(list) = content.listening_sections.as_mut() {
        normalize_question_holders(list);
    }
    if let Some(list) = content.speaking_parts.as_mut() {
        normalize_question_holders(list);
    }
    if let Some(block) = content.reading.as_mut() {
        normalize_question_holders(&mut block.sections);
    }
    if let Some(block) = content.listening.as_mut() {
        normalize_question_holders(&mut block.sections);
    }
    if let Some(block) = content.speaking.as_mut() {
        normalize_question_holders(&mut block.parts);
    }
}

fn normalize_question_holders(holders: &mut [Value]) {
    for holder in holders {
        let Some(obj) = holder.as_object_mut() else {
            continue;
        };
        let normalized = match obj.get("questions") {
            Some(questions) if questions.is_array() => {
                Some(Value::Array(normalize_questions(questions)))
            }
            _ => None,
        };
        if let Some(questions) = normalized {
            obj.insert("questions".to_string(), questions);
        }
    }
}

fn fill_content(question_type: QuestionType, content: &mut Map<String, Value>) {
    match question_type {
        QuestionType::MultipleChoiceSingle => {
            fill_text(content, "question", Some("statement"));
            fill(content, "options", json!([]));
            fill(content, "correctAnswer", json!(""));
            fill(content, "explanation", json!(""));
        }
        QuestionType::MultipleChoiceMultiple => {
            fill_text(content, "question", Some("statement"));
            fill(content, "options", json!([]));
            fill(content, "correctAnswers", json!([]));
            fill(content, "explanation", json!(""));
        }
        QuestionType::TrueFalseNotGiven | QuestionType::YesNoNotGiven => {
            fill_text(content, "statement", Some("question"));
            fill(content, "answer", json!(""));
            fill(content, "explanation", json!(""));
        }
        QuestionType::ShortAnswer => {
            fill_text(content, "question", Some("statement"));
            fill(content, "correctAnswers", json!([]));
            fill(content, "wordLimit", json!(3));
            fill(content, "explanation", json!(""));
        }
        QuestionType::SentenceCompletion => {
            fill_text(content, "sentence", Some("question"));
            fill(content, "correctAnswers", json!([]));
            fill(content, "explanation", json!(""));
        }
        QuestionType::MatchingHeadings => {
            fill_text(content, "question", None);
            fill(content, "headings", json!([]));
            fill(content, "items", json!([]));
            fill(content, "correctMatches", json!({}));
        }
        QuestionType::Essay => {
            fill_text(content, "prompt", Some("question"));
            fill(content, "minWords", json!(250));
            fill(content, "sampleAnswer", json!(""));
        }
        QuestionType::SpeakingPrompt => {
            fill_text(content, "prompt", Some("question"));
            fill(content, "preparationTime", json!(60));
            fill(content, "speakingTime", json!(120));
        }
    }
}

fn fill(content: &mut Map<String, Value>, key: &str, default: Value) {
    let missing = content.get(key).map_or(true, Value::is_null);
    if missing {
        content.insert(key.to_string(), default);
    }
}

fn fill_text(content: &mut Map<String, Value>, key: &str, alias: Option<&str>) {
    let present = content
        .get(key)
        .and_then(Value::as_str)
        .map_or(false, |s| !s.is_empty());
    if present {
        return;
    }

    let salvaged = alias
        .and_then(|a| content.get(a))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .unwrap_or_default();
    content.insert(key.to_string(), Value::String(salvaged));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_type_passes_through_unchanged() {
        let question = json!({ "type": "unknown_type", "content": { "foo": "bar" } });
        assert_eq!(normalize_question(&question), question);
    }

    #[test]
    fn missing_type_and_non_object_pass_through() {
        let no_type = json!({ "content": { "question": "Q?" } });
        assert_eq!(normalize_question(&no_type), no_type);
        assert_eq!(normalize_question(&json!("scalar")), json!("scalar"));
    }

    #[test]
    fn statement_is_salvaged_from_question_alias() {
        let question = json!({
            "type": "true_false_not_given",
            "order": 1,
            "content": { "question": "The author agrees." }
        });

        let out = normalize_question(&question);
        assert_eq!(out["content"]["statement"], "The author agrees.");
        assert_eq!(out["content"]["answer"], "");
        assert_eq!(out["content"]["explanation"], "");
        // Sibling fields survive.
        assert_eq!(out["order"], 1);
    }

    #[test]
    fn existing_fields_are_never_overwritten() {
        let question = json!({
            "type": "multiple_choice_single",
            "content": {
                "question": "Pick one",
                "options": ["a", "b"],
                "correctAnswer": "a",
                "explanation": "because"
            }
        });

        let out = normalize_question(&question);
        assert_eq!(out, question);
    }

    #[test]
    fn short_answer_gets_word_limit_default() {
        let question = json!({
            "type": "short_answer",
            "content": { "question": "Q?", "correctAnswers": ["A"] }
        });

        let out = normalize_question(&question);
        assert_eq!(out["content"]["wordLimit"], 3);
        assert_eq!(out["content"]["correctAnswers"], json!(["A"]));
    }

    #[test]
    fn missing_content_is_built_from_defaults() {
        let question = json!({ "type": "matching_headings" });
        let out = normalize_question(&question);
        assert_eq!(out["content"]["question"], "");
        assert_eq!(out["content"]["headings"], json!([]));
        assert_eq!(out["content"]["items"], json!([]));
        assert_eq!(out["content"]["correctMatches"], json!({}));
    }

    #[test]
    fn normalize_questions_handles_non_list_input() {
        assert!(normalize_questions(&json!({ "not": "a list" })).is_empty());
        assert!(normalize_questions(&Value::Null).is_empty());

        let list = json!([{ "type": "essay", "content": {} }]);
        let out = normalize_questions(&list);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["content"]["minWords"], 250);
    }
}
