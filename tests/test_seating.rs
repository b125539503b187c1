//! Seating arrangement invariants: every student exactly once, dense unique
//! grid positions, scores in range, preferences honored where feasible.

use classinsight_data::domain::seating::{
    self, OptimizationRequest, SeatingConstraints, GRID_COLS,
};
use classinsight_data::{DataSourceAdapter, MockAdapter, Student};
use std::collections::HashSet;
use std::env;

fn roster(n: usize) -> Vec<Student> {
    (0..n)
        .map(|i| Student::new(format!("S{:02}", i), format!("S{:02}", i)))
        .collect()
}

#[tokio::test]
async fn twelve_students_without_service_get_a_full_arrangement() {
    env::remove_var("OPTIMIZATION_API_URL");

    let request = OptimizationRequest {
        students: roster(12),
        constraints: None,
    };
    let client = reqwest::Client::new();
    let response = seating::optimize(&client, &request).await;

    assert!(response.success);
    let result = response.data.expect("arrangement");
    assert_eq!(result.seating_arrangement.len(), 12);

    let input_ids: HashSet<String> = request.students.iter().map(|s| s.id.clone()).collect();
    let seated_ids: HashSet<String> = result
        .seating_arrangement
        .iter()
        .map(|a| a.student_id.clone())
        .collect();
    assert_eq!(seated_ids, input_ids);

    let positions: HashSet<(u32, u32)> = result
        .seating_arrangement
        .iter()
        .map(|a| (a.position.row, a.position.col))
        .collect();
    assert_eq!(positions.len(), 12, "positions must be unique");

    // Dense grid: reading order with no gaps.
    for index in 0..12u32 {
        assert!(positions.contains(&(index / GRID_COLS, index % GRID_COLS)));
    }

    assert!((0.0..=1.0).contains(&result.score));
    assert!(!result.improvements.is_empty());
}

#[test]
fn front_preference_lands_in_the_front_row() {
    let request = OptimizationRequest {
        students: roster(10),
        constraints: Some(SeatingConstraints {
            avoid_neighbors: Vec::new(),
            prefer_front: vec!["S07".to_string(), "S09".to_string()],
            prefer_back: vec!["S00".to_string()],
        }),
    };

    let result = seating::arrange_locally(&request);
    let position_of = |id: &str| {
        result
            .seating_arrangement
            .iter()
            .find(|a| a.student_id == id)
            .map(|a| a.position)
            .expect("seated")
    };

    assert_eq!(position_of("S07").row, 0);
    assert_eq!(position_of("S09").row, 0);
    assert_eq!(position_of("S00").row, 1);
    assert!((result.score - 1.0).abs() < f64::EPSILON);
}

#[test]
fn avoid_pair_is_separated_when_the_grid_allows() {
    let request = OptimizationRequest {
        students: roster(6),
        constraints: Some(SeatingConstraints {
            avoid_neighbors: vec!["S00".to_string(), "S01".to_string()],
            prefer_front: Vec::new(),
            prefer_back: Vec::new(),
        }),
    };

    // The swap pass only keeps improvements, so with a single satisfiable
    // pair the final score must be 1.0.
    let result = seating::arrange_locally(&request);
    assert!((result.score - 1.0).abs() < f64::EPSILON);

    let position_of = |id: &str| {
        result
            .seating_arrangement
            .iter()
            .find(|a| a.student_id == id)
            .map(|a| a.position)
            .expect("seated")
    };
    let a = position_of("S00");
    let b = position_of("S01");
    let adjacent = (a.row == b.row && a.col.abs_diff(b.col) == 1)
        || (a.col == b.col && a.row.abs_diff(b.row) == 1);
    assert!(!adjacent);
}

#[test]
fn no_constraints_scores_neutral() {
    let result = seating::arrange_locally(&OptimizationRequest {
        students: roster(4),
        constraints: None,
    });
    assert!((result.score - 0.75).abs() < f64::EPSILON);
}

#[test]
fn empty_roster_yields_empty_arrangement() {
    let result = seating::arrange_locally(&OptimizationRequest {
        students: Vec::new(),
        constraints: None,
    });
    assert!(result.seating_arrangement.is_empty());
}

#[tokio::test]
async fn mock_adapter_optimizes_offline() {
    env::remove_var("OPTIMIZATION_API_URL");

    let adapter = MockAdapter::new();
    let students = adapter.get_students().await.data.expect("roster");
    let count = students.len();

    let response = adapter
        .optimize_classroom(&OptimizationRequest {
            students,
            constraints: None,
        })
        .await;

    assert!(response.success);
    assert_eq!(
        response.data.expect("arrangement").seating_arrangement.len(),
        count
    );
}
