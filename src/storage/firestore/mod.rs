//! Firestore adapter.
//!
//! Talks to the Firestore REST API under
//! `projects/{project}/databases/(default)/documents/schools/{school}/students`.
//! Raw documents are decoded by the [`value`] codec and pushed through the
//! shared normalization, so the canonical shape cannot drift from the other
//! backends.

use crate::domain::model::{
    normalize_student, ApiResponse, DashboardStats, Student,
};
use crate::domain::seating::{self, OptimizationRequest, OptimizationResult};
use crate::infra::http::{self, DEFAULT_TIMEOUT, HEALTH_TIMEOUT};
use crate::storage::adapter::{DataSourceAdapter, HealthReport};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value as JsonValue};
use std::time::{Duration, Instant};

pub mod value;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";

const NOT_CONFIGURED: &str =
    "Firestore is not configured. Set FIREBASE_PROJECT_ID to enable it.";

pub struct FirestoreAdapter {
    client: reqwest::Client,
    project_id: String,
    school_id: String,
    api_key: Option<String>,
}

impl FirestoreAdapter {
    pub fn new(
        project_id: impl Into<String>,
        school_id: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let school_id = {
            let s: String = school_id.into();
            if s.is_empty() {
                "default".to_string()
            } else {
                s
            }
        };
        Self {
            client: http::build_client(),
            project_id: project_id.into(),
            school_id,
            api_key,
        }
    }

    fn configured(&self) -> bool {
        !self.project_id.is_empty()
    }

    fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents",
            FIRESTORE_HOST, self.project_id
        )
    }

    fn collection_url(&self) -> String {
        format!("{}/schools/{}/students", self.documents_root(), self.school_id)
    }

    fn document_url(&self, doc_id: &str) -> String {
        format!("{}/{}", self.collection_url(), doc_id)
    }

    fn url(&self, raw: &str, params: &[(&str, &str)]) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(raw)
            .map_err(|e| anyhow::anyhow!("Invalid Firestore URL: {}", e))?;
        for (key, value) in params {
            url.query_pairs_mut().append_pair(key, value);
        }
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<(reqwest::StatusCode, JsonValue)> {
        let response = request
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Firestore request failed: {}", e))?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(JsonValue::Null);
        Ok((status, body))
    }

    fn fail<T>(&self, context: &str, error: anyhow::Error) -> ApiResponse<T> {
        log::error!("FirestoreAdapter: {}: {}", context, error);
        ApiResponse::err(error.to_string())
    }

    /// Fields persisted on every save, mirroring the ingestion schema.
    fn write_fields(student: &Student) -> Map<String, JsonValue> {
        let mut fields = Map::new();
        fields.insert("studentCode".into(), json!(student.student_code));
        fields.insert("classId".into(), json!(student.class_id));
        fields.insert("quarter".into(), json!(student.quarter));
        fields.insert("learningStyle".into(), json!(student.learning_style));
        fields.insert("strengths".into(), json!(student.strengths));
        fields.insert("challenges".into(), json!(student.challenges));
        fields.insert("keyNotes".into(), json!(student.key_notes));
        fields.insert(
            "updatedAt".into(),
            json!(chrono::Utc::now().to_rfc3339()),
        );
        fields
    }

    async fn fetch_students(&self) -> Result<Vec<Student>> {
        // The Apps Script contract has no pagination, and the original SDK
        // read pulled the whole collection; one large page matches that.
        let url = self.url(&self.collection_url(), &[("pageSize", "300")])?;
        let (status, body) = self.send(self.client.get(url), DEFAULT_TIMEOUT).await?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("Firestore returned HTTP {}", status.as_u16()));
        }

        let documents = body
            .get("documents")
            .and_then(|d| d.as_array())
            .cloned()
            .unwrap_or_default();
        Ok(documents
            .iter()
            .map(|doc| {
                let (doc_id, fields) = value::decode_document(doc);
                normalize_student(&fields, &doc_id)
            })
            .collect())
    }

    async fn fetch_student(&self, student_id: &str) -> Result<Option<Student>> {
        let url = self.url(&self.document_url(student_id), &[])?;
        let (status, body) = self.send(self.client.get(url), DEFAULT_TIMEOUT).await?;

        if status.is_success() {
            let (doc_id, fields) = value::decode_document(&body);
            return Ok(Some(normalize_student(&fields, &doc_id)));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            // Callers key on the student code; fall back to a code lookup
            // when the argument was not a raw document id.
            let matches = self.run_query("studentCode", student_id).await?;
            return Ok(matches.into_iter().next());
        }
        Err(anyhow::anyhow!("Firestore returned HTTP {}", status.as_u16()))
    }

    async fn run_query(&self, field: &str, equals: &str) -> Result<Vec<Student>> {
        let url = self.url(
            &format!("{}/schools/{}:runQuery", self.documents_root(), self.school_id),
            &[],
        )?;
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": "students" }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": { "stringValue": equals }
                    }
                }
            }
        });
        let (status, body) = self
            .send(self.client.post(url).json(&query), DEFAULT_TIMEOUT)
            .await?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("Firestore returned HTTP {}", status.as_u16()));
        }

        // runQuery responds with a stream of result entries; entries without
        // a `document` key only carry read metadata.
        let entries = body.as_array().cloned().unwrap_or_default();
        Ok(entries
            .iter()
            .filter_map(|entry| entry.get("document"))
            .map(|doc| {
                let (doc_id, fields) = value::decode_document(doc);
                normalize_student(&fields, &doc_id)
            })
            .collect())
    }

    async fn put_student(&self, student: &Student) -> Result<Student> {
        let fields = Self::write_fields(student);
        let body = json!({ "fields": value::encode_fields(&fields) });

        // An update carries a real document id; a create does not. Fragile
        // if a backend ever assigns an id equal to the code, but the
        // backends observed here never do (see DESIGN.md).
        if !student.id.is_empty() && student.id != student.student_code {
            let mut params: Vec<(&str, &str)> = vec![("currentDocument.exists", "true")];
            for key in fields.keys() {
                params.push(("updateMask.fieldPaths", key.as_str()));
            }
            let url = self.url(&self.document_url(&student.id), &params)?;
            let (status, response) = self
                .send(self.client.patch(url).json(&body), DEFAULT_TIMEOUT)
                .await?;
            if !status.is_success() {
                return Err(anyhow::anyhow!(
                    "Firestore update failed with HTTP {}",
                    status.as_u16()
                ));
            }
            let (doc_id, decoded) = value::decode_document(&response);
            Ok(normalize_student(&decoded, &doc_id))
        } else {
            let url = self.url(&self.collection_url(), &[])?;
            let (status, response) = self
                .send(self.client.post(url).json(&body), DEFAULT_TIMEOUT)
                .await?;
            if !status.is_success() {
                return Err(anyhow::anyhow!(
                    "Firestore create failed with HTTP {}",
                    status.as_u16()
                ));
            }
            let (doc_id, decoded) = value::decode_document(&response);
            Ok(normalize_student(&decoded, &doc_id))
        }
    }

    async fn remove_student(&self, student_id: &str) -> Result<()> {
        let url = self.url(&self.document_url(student_id), &[])?;
        let (status, _) = self.send(self.client.delete(url), DEFAULT_TIMEOUT).await?;
        // Deleting an absent document is a no-op, matching backend semantics.
        if status.is_success() || status == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        Err(anyhow::anyhow!(
            "Firestore delete failed with HTTP {}",
            status.as_u16()
        ))
    }
}

#[async_trait]
impl DataSourceAdapter for FirestoreAdapter {
    fn name(&self) -> &'static str {
        "firestore"
    }

    async fn get_students(&self) -> ApiResponse<Vec<Student>> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        match self.fetch_students().await {
            Ok(students) => ApiResponse::ok(students),
            Err(e) => self.fail("error fetching students", e),
        }
    }

    async fn get_student(&self, student_id: &str) -> ApiResponse<Student> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        match self.fetch_student(student_id).await {
            Ok(Some(student)) => ApiResponse::ok(student),
            Ok(None) => ApiResponse::err(format!("Student not found: {}", student_id)),
            Err(e) => self.fail("error fetching student", e),
        }
    }

    async fn save_student(&self, student: &Student) -> ApiResponse<Student> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        match self.put_student(student).await {
            Ok(saved) => ApiResponse::ok(saved),
            Err(e) => self.fail("error saving student", e),
        }
    }

    async fn delete_student(&self, student_id: &str) -> ApiResponse<()> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        match self.remove_student(student_id).await {
            Ok(()) => ApiResponse::ok(()),
            Err(e) => self.fail("error deleting student", e),
        }
    }

    async fn get_stats(&self) -> ApiResponse<DashboardStats> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        match self.fetch_students().await {
            Ok(students) => ApiResponse::ok(DashboardStats::from_students(&students)),
            Err(e) => self.fail("error fetching stats", e),
        }
    }

    async fn get_students_by_class(&self, class_id: &str) -> ApiResponse<Vec<Student>> {
        if !self.configured() {
            return ApiResponse::err(NOT_CONFIGURED);
        }
        match self.run_query("classId", class_id).await {
            Ok(students) => ApiResponse::ok(students),
            Err(e) => self.fail("error fetching students by class", e),
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
        let probe = async {
            let url = self.url(&self.collection_url(), &[("pageSize", "1")])?;
            let (status, _) = self.send(self.client.get(url), HEALTH_TIMEOUT).await?;
            if !status.is_success() {
                return Err(anyhow::anyhow!("HTTP {}", status.as_u16()));
            }
            Ok::<(), anyhow::Error>(())
        };

        match probe.await {
            Ok(()) => HealthReport::from_latency_ms(start.elapsed().as_secs_f64() * 1000.0),
            Err(e) => {
                log::warn!("FirestoreAdapter: health check failed: {}", e);
                HealthReport::down()
            }
        }
    }
}
