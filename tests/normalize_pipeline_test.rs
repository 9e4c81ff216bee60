//! End-to-end tests for the normalization pipeline: id assignment on the
//! write path, structure reconciliation and question defaulting on the read
//! path. Everything here is pure, no database required.

use ielts_backend::models::test::TestDocument;
use ielts_backend::normalize::ids::assign_ids;
use ielts_backend::normalize::question::{normalize_content_questions, normalize_question};
use ielts_backend::normalize::structure::{
    to_admin_format, to_client_format, to_unified, DEFAULT_SECTION_MINUTES,
    DEFAULT_TEST_DURATION_MINUTES,
};
use serde_json::{json, Value};

fn document(value: Value) -> TestDocument {
    serde_json::from_value(value).expect("test document")
}

#[test]
fn assign_ids_is_idempotent_over_a_full_payload() {
    let payload = json!({
        "reading": {
            "sections": [
                { "_id": "651f0c", "title": "Passage 1",
                  "questions": [{ "type": "short_answer", "order": 1 }] }
            ],
            "totalTime": 20
        },
        "speaking": {
            "parts": [{ "partNumber": 2, "questions": [{ "type": "speaking_prompt" }] }],
            "totalTime": 14
        }
    });

    let once = assign_ids(&payload);
    let twice = assign_ids(&once);
    assert_eq!(once, twice);

    // The internal id was reused, then stripped.
    assert_eq!(once["reading"]["sections"][0]["id"], "651f0c");
    assert!(once["reading"]["sections"][0].get("_id").is_none());
}

#[test]
fn nested_only_input_produces_equivalent_flat_shape() {
    let content = assign_ids(&json!({
        "reading": {
            "sections": [{
                "title": "T",
                "passage": "P",
                "questions": [{
                    "type": "short_answer",
                    "order": 1,
                    "content": { "question": "Q?", "correctAnswers": ["A"] }
                }]
            }],
            "totalTime": 20
        }
    }));

    let mut test = document(json!({ "title": "Scenario 1" }));
    test.content = serde_json::from_value(content).unwrap();

    let out = to_unified(test);

    let flat = out.content.reading_sections.as_ref().expect("flat shape");
    let nested = &out.content.reading.as_ref().expect("nested shape").sections;
    assert_eq!(flat, nested);

    let section_id = flat[0]["id"].as_str().expect("section id");
    assert!(section_id.starts_with("section-"));
    let question_id = flat[0]["questions"][0]["id"].as_str().expect("question id");
    assert!(question_id.starts_with("question-"));

    assert!(out
        .skills
        .as_ref()
        .expect("skills")
        .contains(&"Reading".to_string()));
}

#[test]
fn flat_only_listening_gains_nested_shape_with_documented_fallback() {
    let test = document(json!({
        "title": "Scenario 2",
        "listeningSections": [{ "title": "L1", "questions": [] }]
    }));

    let out = to_admin_format(test);

    let nested = out.content.listening.as_ref().expect("nested listening");
    assert_eq!(nested.sections[0]["title"], "L1");
    assert_eq!(nested.total_time, DEFAULT_SECTION_MINUTES);
}

#[test]
fn empty_document_normalizes_to_defaults() {
    let out = to_unified(document(json!({})));

    assert_eq!(out.duration, Some(DEFAULT_TEST_DURATION_MINUTES));
    assert_eq!(out.skills.as_deref(), Some(&[][..]));

    let statistics = out.statistics.expect("statistics");
    assert_eq!(statistics.total_attempts, 0);
    assert_eq!(statistics.completed_attempts, 0);

    let settings = out.settings.expect("settings");
    assert!(settings.allow_review);
    assert!(!settings.shuffle_questions);
}

#[test]
fn round_trip_preserves_flat_skill_lists() {
    let test = document(json!({
        "title": "Round trip",
        "reading": {
            "sections": [{ "id": "section-1", "title": "R", "suggestedTime": 20,
                           "questions": [] }],
            "totalTime": 20
        },
        "speakingParts": [{ "id": "part-1", "partNumber": 1, "speakingTime": 120 }]
    }));

    let unified = to_unified(test);
    let expected: Vec<Option<Vec<Value>>> = vec![
        unified.content.reading_sections.clone(),
        unified.content.listening_sections.clone(),
        unified.content.writing_tasks.clone(),
        unified.content.speaking_parts.clone(),
    ];

    let round_tripped = to_client_format(to_admin_format(unified));
    let actual = vec![
        round_tripped.content.reading_sections.clone(),
        round_tripped.content.listening_sections.clone(),
        round_tripped.content.writing_tasks.clone(),
        round_tripped.content.speaking_parts.clone(),
    ];

    assert_eq!(actual, expected);
    assert!(round_tripped.content.reading.is_none());
    assert!(round_tripped.content.speaking.is_none());
}

#[test]
fn true_false_not_given_statement_is_salvaged() {
    let question = json!({
        "type": "true_false_not_given",
        "order": 3,
        "content": { "question": "The ice sheet is shrinking." }
    });

    let out = normalize_question(&question);
    assert_eq!(out["content"]["statement"], "The ice sheet is shrinking.");
}

#[test]
fn unknown_question_type_passes_through() {
    let question = json!({ "type": "unknown_type", "content": { "foo": "bar" } });
    assert_eq!(normalize_question(&question), question);
}

#[test]
fn read_path_normalizes_questions_in_both_shapes() {
    let mut test = document(json!({
        "title": "Read path",
        "readingSections": [{
            "id": "section-1",
            "title": "R",
            "questions": [{ "type": "multiple_choice_single",
                            "content": { "question": "Pick" } }]
        }]
    }));

    test = to_admin_format(test);
    normalize_content_questions(&mut test.content);

    let flat_q = &test.content.reading_sections.as_ref().unwrap()[0]["questions"][0];
    assert_eq!(flat_q["content"]["options"], json!([]));
    assert_eq!(flat_q["content"]["correctAnswer"], "");

    let nested_q =
        &test.content.reading.as_ref().unwrap().sections[0]["questions"][0];
    assert_eq!(nested_q["content"]["options"], json!([]));
}
