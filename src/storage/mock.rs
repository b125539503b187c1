//! In-memory reference adapter.
//!
//! Full CRUD over a seeded roster, with artificial delays weighted by
//! operation cost to keep callers honest about async behavior. This adapter
//! is the reference for the normalized output shape: any field it populates
//! must also be populated (possibly with a fallback) by the remote adapters.

use crate::domain::model::{ApiResponse, DashboardStats, Student};
use crate::domain::seating::{self, OptimizationRequest, OptimizationResult};
use crate::storage::adapter::{DataSourceAdapter, HealthReport};
use async_trait::async_trait;
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

fn seed(
    code: &str,
    class_id: &str,
    name: &str,
    learning_style: &str,
    key_notes: &str,
    strengths_count: u32,
    challenges_count: u32,
) -> Student {
    let mut s = Student::new(code, code);
    s.class_id = class_id.to_string();
    s.quarter = "Q1".to_string();
    s.learning_style = learning_style.to_string();
    s.key_notes = key_notes.to_string();
    s.strengths_count = strengths_count;
    s.challenges_count = challenges_count;
    s.extra.insert("name".to_string(), json!(name));
    s.extra.insert("date".to_string(), json!("15/10/2025"));
    s
}

/// 15 students across 5 classes, three per class.
fn seed_students() -> Vec<Student> {
    vec![
        seed("10101", "י1", "דני כהן", "חזותי", "תלמיד מצטיין בלימודים חזותיים", 6, 2),
        seed("10102", "י1", "שרה לוי", "שמיעתי", "מעדיפה הסברים בעל פה", 5, 3),
        seed("10103", "י1", "יוסי מזרחי", "קינסתטי", "מצטיין בפעילויות מעשיות", 7, 1),
        seed("10201", "י2", "מיכל דוד", "שמיעתי", "תלמידה פעילה ומשתפת פעולה", 6, 2),
        seed("10202", "י2", "אבי שלום", "קינסתטי", "מצטיין בספורט ופעילויות גופניות", 5, 3),
        seed("10203", "י2", "נועה פרץ", "חזותי", "יכולות אמנותיות גבוהות", 7, 2),
        seed("10301", "י3", "עידן חיים", "שמיעתי", "זקוק להתמדה בהקשבה", 4, 4),
        seed("10302", "י3", "תמר בן דוד", "משולב", "תלמידה מעולה עם מוטיבציה גבוהה", 8, 1),
        seed("10303", "י3", "רון ביטון", "קינסתטי", "זקוק לפעילויות אינטראקטיביות", 5, 3),
        seed("10401", "י4", "גל סבן", "חזותי", "מצטיין במתמטיקה ומדעים", 7, 2),
        seed("10402", "י4", "ליאת עמר", "שמיעתי", "יכולות מנהיגות מפותחות", 6, 2),
        seed("10403", "י4", "אורי נחמני", "משולב", "זקוק לתמיכה רגשית", 4, 4),
        seed("10501", "י5", "שירה מלכה", "חזותי", "תלמידה יצירתית עם דמיון עשיר", 7, 1),
        seed("10502", "י5", "דן רוזן", "קינסתטי", "זקוק לתנועה במהלך הלמידה", 5, 3),
        seed("10503", "י5", "מאיה שטרן", "שמיעתי", "מתקשה בריכוז בכיתה רועשת", 4, 5),
    ]
}

pub struct MockAdapter {
    students: Mutex<Vec<Student>>,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self::with_students(seed_students())
    }

    /// Isolated instance over a caller-supplied roster, for tests.
    pub fn with_students(students: Vec<Student>) -> Self {
        Self {
            students: Mutex::new(students),
        }
    }

    async fn delay(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DataSourceAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_students(&self) -> ApiResponse<Vec<Student>> {
        self.delay(100).await;
        ApiResponse::ok(self.students.lock().await.clone())
    }

    async fn get_student(&self, student_id: &str) -> ApiResponse<Student> {
        self.delay(50).await;
        let students = self.students.lock().await;
        match students
            .iter()
            .find(|s| s.student_code == student_id || s.id == student_id)
        {
            Some(student) => ApiResponse::ok(student.clone()),
            None => ApiResponse::err(format!("Student not found: {}", student_id)),
        }
    }

    async fn save_student(&self, student: &Student) -> ApiResponse<Student> {
        self.delay(100).await;
        let mut students = self.students.lock().await;

        if let Some(existing) = students.iter_mut().find(|s| s.id == student.id) {
            *existing = student.clone();
            return ApiResponse::ok(existing.clone());
        }

        let mut created = student.clone();
        if created.id.is_empty() {
            created.id = created.student_code.clone();
        }
        students.push(created.clone());
        ApiResponse::ok(created)
    }

    async fn delete_student(&self, student_id: &str) -> ApiResponse<()> {
        self.delay(50).await;
        let mut students = self.students.lock().await;
        let before = students.len();
        students.retain(|s| s.id != student_id && s.student_code != student_id);

        if students.len() == before {
            return ApiResponse::err(format!("Student not found: {}", student_id));
        }
        ApiResponse::ok(())
    }

    async fn get_stats(&self) -> ApiResponse<DashboardStats> {
        self.delay(100).await;
        let students = self.students.lock().await;
        ApiResponse::ok(DashboardStats::from_students(&students))
    }

    async fn get_students_by_class(&self, class_id: &str) -> ApiResponse<Vec<Student>> {
        self.delay(50).await;
        let students = self.students.lock().await;
        ApiResponse::ok(
            students
                .iter()
                .filter(|s| s.class_id == class_id)
                .cloned()
                .collect(),
        )
    }

    async fn optimize_classroom(
        &self,
        request: &OptimizationRequest,
    ) -> ApiResponse<OptimizationResult> {
        self.delay(200).await;
        // Offline adapter: never calls the optimization service.
        ApiResponse::ok(seating::arrange_locally(request))
    }

    async fn health_check(&self) -> HealthReport {
        let start = Instant::now();
        self.delay(10).await;
        HealthReport::from_latency_ms(start.elapsed().as_secs_f64() * 1000.0)
    }
}
