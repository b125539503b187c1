//! Firestore adapter behavior that needs no live project: configuration
//! failures and the REST value codec.

use classinsight_data::domain::model::normalize_student;
use classinsight_data::storage::firestore::value;
use classinsight_data::{DataSourceAdapter, FirestoreAdapter, HealthStatus, Student};
use serde_json::json;

fn unconfigured() -> FirestoreAdapter {
    FirestoreAdapter::new("", "default", None)
}

#[tokio::test]
async fn missing_project_id_fails_every_operation() {
    let adapter = unconfigured();

    let students = adapter.get_students().await;
    assert!(!students.success);
    assert!(students.error.expect("error").contains("not configured"));

    assert!(!adapter.get_student("10101").await.success);
    assert!(!adapter.save_student(&Student::new("", "10101")).await.success);
    assert!(!adapter.delete_student("10101").await.success);
    assert!(!adapter.get_stats().await.success);
    assert!(!adapter.get_students_by_class("י1").await.success);
}

#[tokio::test]
async fn unconfigured_health_is_down_without_probing() {
    let health = unconfigured().health_check().await;
    assert_eq!(health.status, HealthStatus::Down);
    assert!(health.latency.is_none());
}

#[test]
fn decode_document_unwraps_typed_values() {
    let document = json!({
        "name": "projects/p/databases/(default)/documents/schools/default/students/aBcD1234",
        "fields": {
            "studentCode": { "stringValue": "10101" },
            "classId": { "stringValue": "י1" },
            "quarter": { "stringValue": "Q1" },
            "learningStyle": { "stringValue": "חזותי" },
            "keyNotes": { "stringValue": "notes" },
            "strengths": { "arrayValue": { "values": [
                { "stringValue": "focus" },
                { "stringValue": "memory" }
            ] } },
            "challenges": { "arrayValue": { "values": [
                { "stringValue": "noise" }
            ] } },
            "attempts": { "integerValue": "3" },
            "active": { "booleanValue": true },
            "score": { "doubleValue": 0.5 },
            "missing": { "nullValue": null },
            "profile": { "mapValue": { "fields": {
                "language": { "stringValue": "he" }
            } } }
        }
    });

    let (doc_id, fields) = value::decode_document(&document);
    assert_eq!(doc_id, "aBcD1234");
    assert_eq!(fields["studentCode"], json!("10101"));
    assert_eq!(fields["strengths"], json!(["focus", "memory"]));
    assert_eq!(fields["attempts"], json!(3));
    assert_eq!(fields["active"], json!(true));
    assert_eq!(fields["score"], json!(0.5));
    assert_eq!(fields["missing"], json!(null));
    assert_eq!(fields["profile"], json!({ "language": "he" }));
}

#[test]
fn decoded_document_normalizes_with_counts_from_arrays() {
    let document = json!({
        "name": "projects/p/databases/(default)/documents/schools/default/students/xYz9",
        "fields": {
            "studentCode": { "stringValue": "10201" },
            "strengths": { "arrayValue": { "values": [
                { "stringValue": "a" },
                { "stringValue": "b" },
                { "stringValue": "c" }
            ] } }
        }
    });

    let (doc_id, fields) = value::decode_document(&document);
    let student = normalize_student(&fields, &doc_id);

    assert_eq!(student.id, "xYz9");
    assert_eq!(student.student_code, "10201");
    assert_eq!(student.strengths_count, 3);
    assert_eq!(student.challenges_count, 0);
    // Absent fields fall back to the defined defaults.
    assert_eq!(student.class_id, "Unknown");
    assert_eq!(student.learning_style, "unknown");
    assert_eq!(student.key_notes, "");
}

#[test]
fn encode_fields_round_trips_through_decode() {
    let plain = json!({
        "studentCode": "10301",
        "strengths": ["a", "b"],
        "attempts": 2,
        "active": false,
        "nested": { "k": "v" }
    });

    let encoded = value::encode_fields(plain.as_object().expect("object"));
    let decoded = value::decode_fields(Some(&encoded));
    assert_eq!(decoded, plain);
}
