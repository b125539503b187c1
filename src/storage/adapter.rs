//! The data-source contract.
//!
//! Every backend implements these eight operations. No method may panic or
//! propagate an error for ordinary failure modes (not-found, backend
//! unreachable, unsupported operation); all of those arrive as
//! `ApiResponse { success: false, .. }`. Only programmer errors escape.

use crate::domain::model::{ApiResponse, DashboardStats, Student};
use crate::domain::seating::{OptimizationRequest, OptimizationResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Backends answering slower than this are reported as degraded.
pub const LATENCY_BUDGET_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Down,
}

/// Health checks do not use the envelope: a failing backend is a status,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    /// Round-trip time in milliseconds, when a probe was actually issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
}

impl HealthReport {
    /// The call failed outright, or was never attempted (missing config).
    pub fn down() -> Self {
        Self {
            status: HealthStatus::Down,
            latency: None,
        }
    }

    /// Applies the 1-second degraded budget to a measured round trip.
    pub fn from_latency_ms(latency_ms: f64) -> Self {
        let status = if latency_ms > LATENCY_BUDGET_MS {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };
        Self {
            status,
            latency: Some(latency_ms),
        }
    }
}

#[async_trait]
pub trait DataSourceAdapter: Send + Sync {
    /// Short identifier used in logs and the preflight report.
    fn name(&self) -> &'static str;

    /// All students visible to this backend scope.
    async fn get_students(&self) -> ApiResponse<Vec<Student>>;

    /// A single student by backend id or student code. An unknown id is a
    /// not-found failure naming the id, never an empty success.
    async fn get_student(&self, student_id: &str) -> ApiResponse<Student>;

    /// Create or update. Backends without a write path decline with an
    /// unsupported-operation failure.
    async fn save_student(&self, student: &Student) -> ApiResponse<Student>;

    async fn delete_student(&self, student_id: &str) -> ApiResponse<()>;

    /// Aggregate dashboard view.
    async fn get_stats(&self) -> ApiResponse<DashboardStats>;

    async fn get_students_by_class(&self, class_id: &str) -> ApiResponse<Vec<Student>>;

    /// Seating optimization; delegates to the external service when one is
    /// configured, otherwise falls back to the local heuristic.
    async fn optimize_classroom(
        &self,
        request: &OptimizationRequest,
    ) -> ApiResponse<OptimizationResult>;

    async fn health_check(&self) -> HealthReport;
}
