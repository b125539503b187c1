//! Sheets adapter policy behavior that needs no live endpoint: declined
//! mutations, unconfigured-URL handling, and error sanitization.

use classinsight_data::infra::sanitize::ErrorSanitizer;
use classinsight_data::{DataSourceAdapter, HealthStatus, SheetsAdapter, Student};

const DEPLOYED_URL: &str = "https://script.google.com/macros/s/abc123/exec";

fn valid_student() -> Student {
    let mut s = Student::new("10101", "10101");
    s.class_id = "י1".to_string();
    s
}

fn malformed_student() -> Student {
    // No code, no class; still declined the same way.
    Student::new("", "")
}

#[tokio::test]
async fn save_is_always_declined() {
    let adapter = SheetsAdapter::new(DEPLOYED_URL);

    for student in [valid_student(), malformed_student()] {
        let response = adapter.save_student(&student).await;
        assert!(!response.success);
        assert!(response.data.is_none());
        assert!(response
            .error
            .expect("error message")
            .contains("not supported in Google Sheets mode"));
    }
}

#[tokio::test]
async fn delete_is_always_declined() {
    let adapter = SheetsAdapter::new(DEPLOYED_URL);

    for id in ["10101", ""] {
        let response = adapter.delete_student(id).await;
        assert!(!response.success);
        assert!(response
            .error
            .expect("error message")
            .contains("not supported in Google Sheets mode"));
    }
}

#[tokio::test]
async fn placeholder_url_means_unconfigured() {
    let adapter =
        SheetsAdapter::new("https://script.google.com/macros/s/YOUR_DEPLOYMENT_ID/exec");

    let students = adapter.get_students().await;
    assert!(!students.success);
    assert!(students.error.expect("error").contains("not configured"));

    let student = adapter.get_student("10101").await;
    assert!(!student.success);

    let stats = adapter.get_stats().await;
    assert!(!stats.success);

    // The client-side class filter propagates the underlying failure.
    let by_class = adapter.get_students_by_class("י1").await;
    assert!(!by_class.success);
    assert!(by_class.error.is_some());
}

#[tokio::test]
async fn unconfigured_health_is_down_without_probing() {
    let adapter = SheetsAdapter::new("");
    let health = adapter.health_check().await;
    assert_eq!(health.status, HealthStatus::Down);
    assert!(health.latency.is_none());
}

#[test]
fn sanitizer_redacts_addresses_paths_and_ports() {
    let sanitizer = ErrorSanitizer::new();
    let message = "connect to 192.168.1.5:8080 failed while reading /Users/test/app";

    let clean = sanitizer.sanitize(message);
    assert!(!clean.contains("192.168.1.5:8080"));
    assert!(!clean.contains("192.168.1.5"));
    assert!(!clean.contains("/Users/test/app"));
    assert!(clean.contains("[IP_REMOVED]"));
    assert!(clean.contains("[PATH_REMOVED]"));
    assert!(clean.contains(":[PORT]"));
}

#[test]
fn sanitizer_leaves_plain_messages_alone() {
    let sanitizer = ErrorSanitizer::new();
    let message = "Student not found: 10101";
    assert_eq!(sanitizer.sanitize(message), message);
}
