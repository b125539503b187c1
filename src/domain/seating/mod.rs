//! Classroom seating optimization.
//!
//! The real solver is an external service; this module owns the wire types,
//! the HTTP delegation, and the local fallback used when no service is
//! configured. The fallback is a constraint-scoring heuristic, not an
//! optimizer: it seats students on a dense grid seeded by front/back
//! preferences and then runs bounded random-swap improvement passes.

use crate::domain::model::{ApiResponse, Student};
use crate::infra::config;
use crate::infra::http::OPTIMIZE_TIMEOUT;
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Classroom rows are filled five seats at a time, reading order.
pub const GRID_COLS: u32 = 5;

/// Random-swap budget for the local improvement pass.
const SWAP_PASSES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub row: u32,
    pub col: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAssignment {
    pub student_id: String,
    pub position: Position,
}

/// Optional seating preferences. Each list holds student identifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatingConstraints {
    /// Students in this list should not sit adjacent to each other.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avoid_neighbors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefer_front: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefer_back: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRequest {
    pub students: Vec<Student>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<SeatingConstraints>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// One entry per input student, dense grid, no duplicate positions.
    pub seating_arrangement: Vec<SeatAssignment>,
    /// Constraint-satisfaction score in `[0, 1]`.
    pub score: f64,
    pub improvements: Vec<String>,
}

/// Delegates to the configured optimization service, falling back to the
/// local heuristic when none is configured. Service failures surface as
/// envelope errors, never as a silently degraded arrangement.
pub async fn optimize(
    client: &reqwest::Client,
    request: &OptimizationRequest,
) -> ApiResponse<OptimizationResult> {
    match config::optimization_api_url() {
        Some(base) => match post_optimize(client, &base, request).await {
            Ok(result) => ApiResponse::ok(result),
            Err(e) => ApiResponse::err(format!("Failed to optimize classroom: {}", e)),
        },
        None => {
            let mut result = arrange_locally(request);
            result.improvements.insert(
                0,
                "No optimization service configured; seated with the local heuristic".to_string(),
            );
            ApiResponse::ok(result)
        }
    }
}

async fn post_optimize(
    client: &reqwest::Client,
    base_url: &str,
    request: &OptimizationRequest,
) -> Result<OptimizationResult> {
    let url = format!("{}/optimize", base_url.trim_end_matches('/'));
    let response = client
        .post(&url)
        .json(request)
        .timeout(OPTIMIZE_TIMEOUT)
        .send()
        .await
        .map_err(|e| anyhow::anyhow!("Optimization request failed: {}", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(anyhow::anyhow!("Optimization API returned {}", status.as_u16()));
    }

    response
        .json::<OptimizationResult>()
        .await
        .map_err(|e| anyhow::anyhow!("Invalid optimization response: {}", e))
}

/// Local constraint-scoring heuristic.
///
/// Every input student appears exactly once; positions fill a `GRID_COLS`
/// wide grid in reading order, so they are dense and unique by construction.
pub fn arrange_locally(request: &OptimizationRequest) -> OptimizationResult {
    let constraints = request.constraints.clone().unwrap_or_default();

    if request.students.is_empty() {
        return OptimizationResult {
            seating_arrangement: Vec::new(),
            score: NEUTRAL_SCORE,
            improvements: vec!["Empty roster; nothing to arrange".to_string()],
        };
    }

    let mut improvements = Vec::new();

    // Seed order: front-preference first, back-preference last.
    let mut front = Vec::new();
    let mut middle = Vec::new();
    let mut back = Vec::new();
    for s in &request.students {
        if constraints.prefer_front.contains(&s.id) {
            front.push(s.id.clone());
        } else if constraints.prefer_back.contains(&s.id) {
            back.push(s.id.clone());
        } else {
            middle.push(s.id.clone());
        }
    }
    let mut seated: Vec<String> = front;
    seated.append(&mut middle);
    seated.append(&mut back);

    let last_row = (seated.len() as u32 - 1) / GRID_COLS;

    // Random-swap improvement: keep a swap only when the score rises.
    let mut rng = rand::thread_rng();
    let mut best = constraint_score(&seated, &constraints, last_row);
    if seated.len() > 1 {
        for _ in 0..SWAP_PASSES {
            let a = rng.gen_range(0..seated.len());
            let b = rng.gen_range(0..seated.len());
            if a == b {
                continue;
            }
            seated.swap(a, b);
            let score = constraint_score(&seated, &constraints, last_row);
            if score > best {
                best = score;
            } else {
                seated.swap(a, b);
            }
        }
    }

    let seating_arrangement: Vec<SeatAssignment> = seated
        .iter()
        .enumerate()
        .map(|(i, id)| SeatAssignment {
            student_id: id.clone(),
            position: Position {
                row: i as u32 / GRID_COLS,
                col: i as u32 % GRID_COLS,
            },
        })
        .collect();

    describe_placement(&seating_arrangement, &constraints, last_row, &mut improvements);

    OptimizationResult {
        seating_arrangement,
        score: best,
        improvements,
    }
}

/// Score reported when no constraints were given; there is nothing to
/// satisfy or violate, so the arrangement is "fine" rather than perfect.
const NEUTRAL_SCORE: f64 = 0.75;

fn row_of(seated: &[String], id: &str) -> Option<u32> {
    seated
        .iter()
        .position(|s| s == id)
        .map(|i| i as u32 / GRID_COLS)
}

fn adjacent(a: usize, b: usize) -> bool {
    let (ra, ca) = (a as u32 / GRID_COLS, a as u32 % GRID_COLS);
    let (rb, cb) = (b as u32 / GRID_COLS, b as u32 % GRID_COLS);
    (ra == rb && ca.abs_diff(cb) == 1) || (ca == cb && ra.abs_diff(rb) == 1)
}

/// Satisfied fraction over all applicable constraints.
fn constraint_score(seated: &[String], constraints: &SeatingConstraints, last_row: u32) -> f64 {
    let mut total = 0u32;
    let mut satisfied = 0u32;

    // Every unordered pair of listed students must be non-adjacent.
    let listed: Vec<usize> = constraints
        .avoid_neighbors
        .iter()
        .filter_map(|id| seated.iter().position(|s| s == id))
        .collect();
    for i in 0..listed.len() {
        for j in (i + 1)..listed.len() {
            total += 1;
            if !adjacent(listed[i], listed[j]) {
                satisfied += 1;
            }
        }
    }

    for id in &constraints.prefer_front {
        if let Some(row) = row_of(seated, id) {
            total += 1;
            if row == 0 {
                satisfied += 1;
            }
        }
    }
    for id in &constraints.prefer_back {
        if let Some(row) = row_of(seated, id) {
            total += 1;
            if row == last_row {
                satisfied += 1;
            }
        }
    }

    if total == 0 {
        NEUTRAL_SCORE
    } else {
        f64::from(satisfied) / f64::from(total)
    }
}

fn describe_placement(
    arrangement: &[SeatAssignment],
    constraints: &SeatingConstraints,
    last_row: u32,
    improvements: &mut Vec<String>,
) {
    let in_front = arrangement
        .iter()
        .filter(|a| constraints.prefer_front.contains(&a.student_id) && a.position.row == 0)
        .count();
    if !constraints.prefer_front.is_empty() {
        improvements.push(format!(
            "Placed {} of {} front-preference students in the front row",
            in_front,
            constraints.prefer_front.len()
        ));
    }

    let in_back = arrangement
        .iter()
        .filter(|a| constraints.prefer_back.contains(&a.student_id) && a.position.row == last_row)
        .count();
    if !constraints.prefer_back.is_empty() {
        improvements.push(format!(
            "Placed {} of {} back-preference students in the back row",
            in_back,
            constraints.prefer_back.len()
        ));
    }

    if !constraints.avoid_neighbors.is_empty() {
        improvements.push(format!(
            "Kept {} flagged students apart where the grid allowed",
            constraints.avoid_neighbors.len()
        ));
    }

    if improvements.is_empty() {
        improvements.push("No seating constraints provided; used reading-order grid".to_string());
    }
}
