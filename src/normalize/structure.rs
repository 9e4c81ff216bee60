use serde_json::Value;

use crate::models::test::{
    PartBlock, SectionBlock, TaskBlock, TestContent, TestDocument, TestSettings, TestStatistics,
};

/// Fallback test duration when `totalTime` is absent or zero. Flagged for
/// product-owner confirmation; see DESIGN.md.
pub const DEFAULT_TEST_DURATION_MINUTES: i64 = 180;

/// Per-section (and per-writing-task) `suggestedTime` fallback used when the
/// nested skill time budget is derived from the flat shape. Also flagged for
/// product-owner confirmation.
pub const DEFAULT_SECTION_MINUTES: i64 = 20;

const SECONDS_PER_MINUTE: i64 = 60;

/// Ensures the flat-shape lists are populated from the nested shape, then
/// fills the derived fields (`skills`, `duration`, `statistics`, `settings`).
pub fn to_unified(mut test: TestDocument) -> TestDocument {
    populate_flat(&mut test.content);
    fill_derived(&mut test);
    test
}

/// Inverse direction: ensures the nested shape is populated from the flat
/// lists, deriving each skill-level time budget from the entities' own time
/// fields. Derived fields are filled the same way as [`to_unified`].
pub fn to_admin_format(mut test: TestDocument) -> TestDocument {
    populate_nested(&mut test.content);
    fill_derived(&mut test);
    test
}

/// Like [`to_unified`], but the nested-shape keys are removed entirely;
/// client-facing payloads are flat-only.
pub fn to_client_format(test: TestDocument) -> TestDocument {
    let mut test = to_unified(test);
    test.content.reading = None;
    test.content.listening = None;
    test.content.writing = None;
    test.content.speaking = None;
    test
}

/// The eight one-directional copy checks used by the migration sweep:
/// nested-to-flat and flat-to-nested, one pair per skill. A copy only ever
/// populates an empty side from a non-empty one; when both sides hold
/// content, neither is touched. Returns true when any copy applied.
pub fn reconcile_shapes(content: &mut TestContent) -> bool {
    let flat_changed = populate_flat(content);
    let nested_changed = populate_nested(content);
    flat_changed || nested_changed
}

fn populate_flat(content: &mut TestContent) -> bool {
    let mut changed = false;
    changed |= copy_to_flat(
        content.reading.as_ref().map(|b| &b.sections),
        &mut content.reading_sections,
    );
    changed |= copy_to_flat(
        content.listening.as_ref().map(|b| &b.sections),
        &mut content.listening_sections,
    );
    changed |= copy_to_flat(
        content.writing.as_ref().map(|b| &b.tasks),
        &mut content.writing_tasks,
    );
    changed |= copy_to_flat(
        content.speaking.as_ref().map(|b| &b.parts),
        &mut content.speaking_parts,
    );
    changed
}

fn populate_nested(content: &mut TestContent) -> bool {
    let mut changed = false;

    let reading_has = content
        .reading
        .as_ref()
        .map_or(false, |b| !b.sections.is_empty());
    changed |= copy_to_nested(
        &content.reading_sections,
        &mut content.reading,
        reading_has,
        |sections| SectionBlock {
            total_time: minutes_sum(&sections, suggested_minutes),
            sections,
        },
    );

    let listening_has = content
        .listening
        .as_ref()
        .map_or(false, |b| !b.sections.is_empty());
    changed |= copy_to_nested(
        &content.listening_sections,
        &mut content.listening,
        listening_has,
        |sections| SectionBlock {
            total_time: minutes_sum(&sections, suggested_minutes),
            sections,
        },
    );

    let writing_has = content
        .writing
        .as_ref()
        .map_or(false, |b| !b.tasks.is_empty());
    changed |= copy_to_nested(
        &content.writing_tasks,
        &mut content.writing,
        writing_has,
        |tasks| TaskBlock {
            total_time: minutes_sum(&tasks, suggested_minutes),
            tasks,
        },
    );

    let speaking_has = content
        .speaking
        .as_ref()
        .map_or(false, |b| !b.parts.is_empty());
    changed |= copy_to_nested(
        &content.speaking_parts,
        &mut content.speaking,
        speaking_has,
        |parts| PartBlock {
            total_time: minutes_sum(&parts, speaking_minutes),
            parts,
        },
    );

    changed
}

fn copy_to_flat(nested: Option<&Vec<Value>>, flat: &mut Option<Vec<Value>>) -> bool {
    let flat_has = flat.as_ref().map_or(false, |l| !l.is_empty());
    match nested {
        Some(list) if !list.is_empty() && !flat_has => {
            *flat = Some(list.clone());
            true
        }
        _ => false,
    }
}

fn copy_to_nested<B>(
    flat: &Option<Vec<Value>>,
    nested: &mut Option<B>,
    nested_has: bool,
    build: impl FnOnce(Vec<Value>) -> B,
) -> bool {
    match flat {
        Some(list) if !list.is_empty() && !nested_has => {
            *nested = Some(build(list.clone()));
            true
        }
        _ => false,
    }
}

fn fill_derived(test: &mut TestDocument) {
    test.skills = Some(derive_skills(&test.content));
    test.duration = Some(
        test.total_time
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TEST_DURATION_MINUTES),
    );
    if test.statistics.is_none() {
        test.statistics = Some(TestStatistics::default());
    }
    if test.settings.is_none() {
        test.settings = Some(TestSettings::default());
    }
}

fn derive_skills(content: &TestContent) -> Vec<String> {
    let mut skills = Vec::new();

    let present = |nested_len: usize, flat: &Option<Vec<Value>>| {
        nested_len > 0 || flat.as_ref().map_or(false, |l| !l.is_empty())
    };

    if present(
        content.reading.as_ref().map_or(0, |b| b.sections.len()),
        &content.reading_sections,
    ) {
        skills.push("Reading".to_string());
    }
    if present(
        content.listening.as_ref().map_or(0, |b| b.sections.len()),
        &content.listening_sections,
    ) {
        skills.push("Listening".to_string());
    }
    if present(
        content.writing.as_ref().map_or(0, |b| b.tasks.len()),
        &content.writing_tasks,
    ) {
        skills.push("Writing".to_string());
    }
    if present(
        content.speaking.as_ref().map_or(0, |b| b.parts.len()),
        &content.speaking_parts,
    ) {
        skills.push("Speaking".to_string());
    }

    skills
}

fn minutes_sum(entities: &[Value], minutes: impl Fn(&Value) -> i64) -> i64 {
    entities.iter().map(minutes).sum()
}

fn suggested_minutes(entity: &Value) -> i64 {
    entity
        .get("suggestedTime")
        .and_then(Value::as_f64)
        .map(|m| m.ceil() as i64)
        .unwrap_or(DEFAULT_SECTION_MINUTES)
}

// speakingTime is stored in seconds; the skill budget is in minutes.
fn speaking_minutes(part: &Value) -> i64 {
    part.get("speakingTime")
        .and_then(Value::as_i64)
        .map(|secs| (secs + SECONDS_PER_MINUTE - 1) / SECONDS_PER_MINUTE)
        .unwrap_or(0)
}
