//! Canonical data model shared by every data-source adapter.
//!
//! All adapters normalize their backend's raw records into these shapes, so
//! callers never branch on which backend answered. Wire JSON is camelCase to
//! stay compatible with the dashboard payloads the backends already emit.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

pub mod normalize;

pub use normalize::{is_blank_cell, mode_learning_style, normalize_student};

/// One learner's analysis record.
///
/// `student_code` is the human-facing identifier and the stable primary key
/// from the caller's perspective; `id` is whatever key the backend uses
/// internally (a Firestore document id, or the code itself for backends
/// without separate keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub student_code: String,
    pub class_id: String,
    pub quarter: String,
    pub learning_style: String,
    pub strengths_count: u32,
    pub challenges_count: u32,
    pub key_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Underlying collections the counts are derived from, when the backend
    /// stores them (Firestore does; the Sheets API only reports counts).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub strengths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub challenges: Vec<String>,
    /// Backend fields outside the canonical shape (display name, analysis
    /// date, raw analysis JSON, ...). Preserved so round-trips through an
    /// adapter do not silently drop data.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, JsonValue>,
}

impl Student {
    /// Minimal record with canonical defaults; used by tests and seed data.
    pub fn new(id: impl Into<String>, student_code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            student_code: student_code.into(),
            class_id: "Unknown".to_string(),
            quarter: "רבעון 1".to_string(),
            learning_style: "unknown".to_string(),
            strengths_count: 0,
            challenges_count: 0,
            key_notes: String::new(),
            first_name: None,
            last_name: None,
            strengths: Vec::new(),
            challenges: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Aggregate dashboard view. `average_learning_style` is the mode (most
/// frequent category), not a numeric average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_students: u32,
    pub total_classes: u32,
    pub total_strengths: u32,
    pub total_challenges: u32,
    pub average_learning_style: String,
}

impl DashboardStats {
    /// Pure aggregation over a student collection. The Mock and Firestore
    /// adapters derive their stats exclusively through this function; the
    /// Sheets backend reports a pre-aggregated partial version instead.
    pub fn from_students(students: &[Student]) -> Self {
        let mut classes: Vec<&str> = Vec::new();
        for s in students {
            if !classes.contains(&s.class_id.as_str()) {
                classes.push(&s.class_id);
            }
        }

        Self {
            total_students: students.len() as u32,
            total_classes: classes.len() as u32,
            total_strengths: students.iter().map(|s| s.strengths_count).sum(),
            total_challenges: students.iter().map(|s| s.challenges_count).sum(),
            average_learning_style: mode_learning_style(
                students.iter().map(|s| s.learning_style.as_str()),
            ),
        }
    }
}

/// The universal result envelope.
///
/// Adapter methods never throw for expected failures (network errors,
/// missing configuration, not-found); all such cases arrive here as
/// `success == false` with a human-readable `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level validation messages, when a backend reports them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
        }
    }
}
