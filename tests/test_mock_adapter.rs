//! Mock adapter semantics: the reference behavior the remote adapters'
//! normalized output is validated against.

use classinsight_data::{DataSourceAdapter, HealthStatus, MockAdapter, Student};

#[tokio::test]
async fn seed_stats_scenario() {
    let adapter = MockAdapter::new();

    let students = adapter.get_students().await.data.expect("roster");
    assert_eq!(students.len(), 15);

    let stats = adapter.get_stats().await.data.expect("stats");
    assert_eq!(stats.total_students, 15);
    assert_eq!(stats.total_classes, 5);
    assert_eq!(
        stats.total_strengths,
        students.iter().map(|s| s.strengths_count).sum::<u32>()
    );
    assert_eq!(
        stats.total_challenges,
        students.iter().map(|s| s.challenges_count).sum::<u32>()
    );
    assert!(!stats.average_learning_style.is_empty());
}

#[tokio::test]
async fn bulk_and_single_reads_are_consistent() {
    let adapter = MockAdapter::new();
    let students = adapter.get_students().await.data.expect("roster");

    for expected in &students {
        let got = adapter
            .get_student(&expected.student_code)
            .await
            .data
            .unwrap_or_else(|| panic!("student {} should resolve", expected.student_code));
        assert_eq!(&got, expected);
    }
}

#[tokio::test]
async fn save_then_get_round_trips() {
    let adapter = MockAdapter::new();

    let mut student = Student::new("", "20999");
    student.class_id = "י9".to_string();
    student.learning_style = "חזותי".to_string();
    student.key_notes = "new arrival".to_string();
    student.strengths_count = 3;
    student.challenges_count = 1;

    let saved = adapter.save_student(&student).await.data.expect("saved");
    // Appends default the id to the student code.
    assert_eq!(saved.id, "20999");

    let fetched = adapter.get_student("20999").await.data.expect("fetched");
    assert_eq!(fetched.student_code, student.student_code);
    assert_eq!(fetched.class_id, student.class_id);
    assert_eq!(fetched.learning_style, student.learning_style);
    assert_eq!(fetched.key_notes, student.key_notes);
    assert_eq!(fetched.strengths_count, student.strengths_count);
    assert_eq!(fetched.challenges_count, student.challenges_count);
}

#[tokio::test]
async fn save_overwrites_matching_id() {
    let adapter = MockAdapter::new();

    let mut student = adapter.get_student("10101").await.data.expect("seed student");
    student.key_notes = "updated notes".to_string();

    let saved = adapter.save_student(&student).await;
    assert!(saved.success);

    let fetched = adapter.get_student("10101").await.data.expect("fetched");
    assert_eq!(fetched.key_notes, "updated notes");

    // Overwrite, not append.
    assert_eq!(adapter.get_students().await.data.expect("roster").len(), 15);
}

#[tokio::test]
async fn unknown_student_is_a_not_found_failure() {
    let adapter = MockAdapter::new();

    let response = adapter.get_student("99999").await;
    assert!(!response.success);
    assert!(response.data.is_none());
    let error = response.error.expect("error message");
    assert!(error.contains("99999"));
}

#[tokio::test]
async fn delete_removes_by_code_and_fails_on_unknown() {
    let adapter = MockAdapter::new();

    assert!(adapter.delete_student("10101").await.success);
    assert!(!adapter.get_student("10101").await.success);
    assert_eq!(adapter.get_students().await.data.expect("roster").len(), 14);

    let missing = adapter.delete_student("10101").await;
    assert!(!missing.success);
    assert!(missing.error.expect("error").contains("10101"));
}

#[tokio::test]
async fn returned_values_are_snapshots() {
    let adapter = MockAdapter::new();

    let mut copy = adapter.get_student("10102").await.data.expect("student");
    copy.key_notes = "locally mutated".to_string();

    let fresh = adapter.get_student("10102").await.data.expect("student");
    assert_ne!(fresh.key_notes, "locally mutated");
}

#[tokio::test]
async fn get_students_by_class_filters() {
    let adapter = MockAdapter::new();

    let class = adapter.get_students_by_class("י3").await.data.expect("class");
    assert_eq!(class.len(), 3);
    assert!(class.iter().all(|s| s.class_id == "י3"));

    let empty = adapter.get_students_by_class("י9").await.data.expect("class");
    assert!(empty.is_empty());
}

#[tokio::test]
async fn mock_health_is_always_healthy() {
    let adapter = MockAdapter::new();
    let health = adapter.health_check().await;
    assert_eq!(health.status, HealthStatus::Healthy);
    assert!(health.latency.is_some());
}
