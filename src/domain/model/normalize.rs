//! Maps untyped backend records onto the canonical [`Student`] shape.
//!
//! Both remote adapters (Firestore documents decoded to plain JSON, Sheets
//! rows from the Apps Script endpoint) feed through this one routine so the
//! fallback defaults cannot drift between backends.

use super::Student;
use serde_json::Value as JsonValue;

/// Fields owned by the canonical shape; everything else lands in `extra`.
const CANONICAL_FIELDS: &[&str] = &[
    "id",
    "studentCode",
    "classId",
    "quarter",
    "learningStyle",
    "strengthsCount",
    "challengesCount",
    "keyNotes",
    "firstName",
    "lastName",
    "strengths",
    "challenges",
];

/// True for cells that carry no usable value. The Sheets backend sometimes
/// emits the literal strings `"undefined"` and `"null"` where a cell was
/// empty; those must not leak into lookup keys or displayed fields.
pub fn is_blank_cell(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::String(s) => {
            let t = s.trim();
            t.is_empty() || t == "undefined" || t == "null"
        }
        _ => false,
    }
}

fn string_field(raw: &JsonValue, key: &str) -> Option<String> {
    let value = raw.get(key)?;
    if is_blank_cell(value) {
        return None;
    }
    match value {
        JsonValue::String(s) => Some(s.trim().to_string()),
        // Spreadsheet cells surface numeric codes as JSON numbers.
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn count_field(raw: &JsonValue, key: &str) -> Option<u32> {
    match raw.get(key)? {
        JsonValue::Number(n) => n.as_u64().map(|v| v as u32),
        JsonValue::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Reads a string-list field, if present. Returns `Some` even for an empty
/// array so an explicit empty collection wins over a stale count field.
fn string_list(raw: &JsonValue, key: &str) -> Option<Vec<String>> {
    let items = raw.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter(|v| !is_blank_cell(v))
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
    )
}

/// Normalizes one raw backend record into the canonical shape.
///
/// `doc_id` is the backend-internal key when the backend has one (Firestore
/// document id); pass `""` for backends where the student code is the only
/// key, and `id` falls back to the code. Absent fields get the defined
/// defaults so callers never see a partially populated record.
pub fn normalize_student(raw: &JsonValue, doc_id: &str) -> Student {
    let student_code = string_field(raw, "studentCode").unwrap_or_else(|| doc_id.to_string());
    let id = if doc_id.is_empty() {
        student_code.clone()
    } else {
        doc_id.to_string()
    };

    let strengths = string_list(raw, "strengths");
    let challenges = string_list(raw, "challenges");
    let strengths_count = strengths
        .as_ref()
        .map(|v| v.len() as u32)
        .or_else(|| count_field(raw, "strengthsCount"))
        .unwrap_or(0);
    let challenges_count = challenges
        .as_ref()
        .map(|v| v.len() as u32)
        .or_else(|| count_field(raw, "challengesCount"))
        .unwrap_or(0);

    let mut extra = serde_json::Map::new();
    if let Some(obj) = raw.as_object() {
        for (key, value) in obj {
            if CANONICAL_FIELDS.contains(&key.as_str()) || is_blank_cell(value) {
                continue;
            }
            extra.insert(key.clone(), value.clone());
        }
    }

    Student {
        id,
        student_code,
        class_id: string_field(raw, "classId").unwrap_or_else(|| "Unknown".to_string()),
        quarter: string_field(raw, "quarter").unwrap_or_else(|| "רבעון 1".to_string()),
        learning_style: string_field(raw, "learningStyle")
            .unwrap_or_else(|| "unknown".to_string()),
        strengths_count,
        challenges_count,
        key_notes: string_field(raw, "keyNotes").unwrap_or_default(),
        first_name: string_field(raw, "firstName"),
        last_name: string_field(raw, "lastName"),
        strengths: strengths.unwrap_or_default(),
        challenges: challenges.unwrap_or_default(),
        extra,
    }
}

/// Most frequent learning style, first-seen order breaking ties.
pub fn mode_learning_style<'a>(styles: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, u32)> = Vec::new();
    for style in styles {
        if style.trim().is_empty() {
            continue;
        }
        match counts.iter_mut().find(|(s, _)| *s == style) {
            Some((_, n)) => *n += 1,
            None => counts.push((style, 1)),
        }
    }

    let mut best: Option<(&str, u32)> = None;
    for (style, n) in counts {
        if best.map(|(_, m)| n > m).unwrap_or(true) {
            best = Some((style, n));
        }
    }
    best.map(|(s, _)| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
