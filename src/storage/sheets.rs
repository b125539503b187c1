//! Google Sheets adapter.
//!
//! The backend is a deployed Apps Script web app that only exposes `doGet`,
//! so every operation is a GET parameterized by an `action` query value.
//! The spreadsheet has no update/delete API: mutations are declined by
//! policy, and callers must treat that as a documented mode, not a bug.

use crate::domain::model::{
    normalize_student, ApiResponse, DashboardStats, Student,
};
use crate::domain::seating::{self, OptimizationRequest, OptimizationResult};
use crate::infra::config;
use crate::infra::http::{self, DEFAULT_TIMEOUT, HEALTH_TIMEOUT};
use crate::infra::sanitize::ErrorSanitizer;
use crate::storage::adapter::{DataSourceAdapter, HealthReport};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::{Duration, Instant};

const NOT_CONFIGURED: &str = "Google Sheets API URL not configured";

pub struct SheetsAdapter {
    client: reqwest::Client,
    api_url: String,
    sanitizer: ErrorSanitizer,
}

impl SheetsAdapter {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            client: http::build_client(),
            api_url: api_url.into(),
            sanitizer: ErrorSanitizer::new(),
        }
    }

    fn configured(&self) -> bool {
        !config::is_placeholder_url(&self.api_url)
    }

    fn build_url(&self, action: &str, params: &[(&str, &str)]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.api_url)
            .map_err(|e| anyhow::anyhow!("Invalid API URL: {}", e))?;
        url.query_pairs_mut().append_pair("action", action);
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// One round trip to the Apps Script endpoint. A body carrying a
    /// top-level `error` string is a failure regardless of HTTP status.
    async fn fetch(
        &self,
        action: &str,
        params: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<JsonValue> {
        let url = self.build_url(action, params)?;
        let body = http::get_json(&self.client, url, timeout).await?;
        if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
            return Err(anyhow::anyhow!("{}", message));
        }
        Ok(body)
    }

    fn fail<T>(&self, context: &str, error: anyhow::Error) -> ApiResponse<T> {
        log::error!("SheetsAdapter: {}: {}", context, error);
        ApiResponse::err(self.sanitizer.sanitize(&error.to_string()))
    }
}

/// Most frequent entry of a pre-aggregated `{style: count}` histogram.
fn mode_from_histogram(histogram: &JsonValue) -> String {
    let mut best: Option<(&str, u64)> = None;
    if let Some(map) = histogram.as_object() {
        for (style, count) in map {
            let count = count.as_u64().unwrap_or(0);
            if best.map(|(_, m)| count > m).unwrap_or(true) {
                best = Some((style, count));
            }
        }
    }
    best.map(|(s, _)| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl DataSourceAdapter for SheetsAdapter {
    fn name(&self) -> &'static str {
        "sheets"
    }

    async fn get_students(&self) -> ApiResponse<Vec<Student>> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }

        match self.fetch("getAllStudents", &[], DEFAULT_TIMEOUT).await {
            Ok(body) => {
                let rows = body
                    .get("students")
                    .and_then(|s| s.as_array())
                    .cloned()
                    .unwrap_or_default();
                let students: Vec<Student> = rows
                    .iter()
                    .map(|row| normalize_student(row, ""))
                    // Rows with no usable code cannot be keyed by callers.
                    .filter(|s| !s.student_code.is_empty())
                    .collect();
                ApiResponse::ok(students)
            }
            Err(e) => self.fail("error fetching students", e),
        }
    }

    async fn get_student(&self, student_id: &str) -> ApiResponse<Student> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }

        match self
            .fetch("getStudent", &[("studentId", student_id)], DEFAULT_TIMEOUT)
            .await
        {
            Ok(body) => {
                let student = normalize_student(&body, "");
                if student.student_code.is_empty() {
                    return ApiResponse::err(format!("Student not found: {}", student_id));
                }
                ApiResponse::ok(student)
            }
            Err(e) => self.fail("error fetching student", e),
        }
    }

    async fn save_student(&self, _student: &Student) -> ApiResponse<Student> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        // The Apps Script deployment has no write action.
        ApiResponse::err(
            "Save operation not supported in Google Sheets mode. \
             Use Firestore for full CRUD operations.",
        )
    }

    async fn delete_student(&self, _student_id: &str) -> ApiResponse<()> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        ApiResponse::err(
            "Delete operation not supported in Google Sheets mode. \
             Use Firestore for full CRUD operations.",
        )
    }

    async fn get_stats(&self) -> ApiResponse<DashboardStats> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }

        match self.fetch("getStats", &[], DEFAULT_TIMEOUT).await {
            Ok(body) => {
                let total_classes = body
                    .get("byClass")
                    .and_then(|c| c.as_object())
                    .map(|c| c.len() as u32)
                    .unwrap_or(0);
                let stats = DashboardStats {
                    total_students: body
                        .get("totalStudents")
                        .and_then(|v| v.as_u64())
                        .unwrap_or(0) as u32,
                    total_classes,
                    // Not available in Sheets mode: the getStats action only
                    // reports per-class and per-style histograms.
                    total_strengths: 0,
                    total_challenges: 0,
                    average_learning_style: mode_from_histogram(
                        body.get("byLearningStyle").unwrap_or(&JsonValue::Null),
                    ),
                };
                ApiResponse::ok(stats)
            }
            Err(e) => self.fail("error fetching stats", e),
        }
    }

    async fn get_students_by_class(&self, class_id: &str) -> ApiResponse<Vec<Student>> {
        // No server-side filter action exists; fetch all and filter here.
        let result = self.get_students().await;
        match result.data {
            Some(students) => ApiResponse::ok(
                students
                    .into_iter()
                    .filter(|s| s.class_id == class_id)
                    .collect(),
            ),
            None => ApiResponse {
                success: false,
                data: None,
                error: result.error,
                errors: result.errors,
            },
        }
    }

    async fn optimize_classroom(
        &self,
        request: &OptimizationRequest,
    ) -> ApiResponse<OptimizationResult> {
        seating::optimize(&self.client, request).await
    }

    async fn health_check(&self) -> HealthReport {
        if !self.configured() {
            return HealthReport::down();
        }

        let start = Instant::now();
        match self.fetch("getStats", &[], HEALTH_TIMEOUT).await {
            Ok(_) => HealthReport::from_latency_ms(start.elapsed().as_secs_f64() * 1000.0),
            Err(e) => {
                log::warn!("SheetsAdapter: health check failed: {}", e);
                HealthReport::down()
            }
        }
    }
}
