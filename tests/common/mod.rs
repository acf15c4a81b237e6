#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::RwLock;

use exam_hub_server::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::Exam,
    repositories::ExamRepository,
};

#[derive(Clone, Default)]
pub struct InMemoryExamRepository {
    exams: Arc<RwLock<HashMap<String, Exam>>>,
}

impl InMemoryExamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, exam: Exam) {
        self.exams.write().await.insert(exam.id.clone(), exam);
    }

    pub async fn get(&self, id: &str) -> Option<Exam> {
        self.exams.read().await.get(id).cloned()
    }
}

#[async_trait]
impl ExamRepository for InMemoryExamRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Exam>> {
        Ok(self.exams.read().await.get(id).cloned())
    }

    async fn list_exams(&self, offset: i64, limit: i64) -> AppResult<(Vec<Exam>, i64)> {
        let exams = self.exams.read().await;
        let mut items: Vec<_> = exams.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total = items.len() as i64;
        let page = items
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn create(&self, exam: Exam) -> AppResult<Exam> {
        let mut exams = self.exams.write().await;
        if exams.contains_key(&exam.id) {
            return Err(AppError::Conflict(format!("Exam '{}' already exists", exam.id)));
        }
        exams.insert(exam.id.clone(), exam.clone());
        Ok(exam)
    }

    async fn update(&self, exam: Exam) -> AppResult<Exam> {
        let mut exams = self.exams.write().await;
        match exams.get_mut(&exam.id) {
            Some(existing) => {
                *existing = exam.clone();
                Ok(exam)
            }
            None => Err(AppError::NotFound(format!("Exam with id '{}' not found", exam.id))),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.exams
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Exam with id '{}' not found", id)))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "exam-hub-test".to_string(),
        exams_collection: "exams".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration_test_secret".to_string()),
        jwt_expiration_hours: 1,
        cors_allowed_origin: "http://localhost:5173".to_string(),
        app_env: "test".to_string(),
    }
}

/// Stored exam with `part_count` one-question parts, authored by `author_id`.
pub fn stored_exam(id: &str, author_id: &str, part_count: usize) -> Exam {
    let parts: Vec<serde_json::Value> = (0..part_count)
        .map(|i| {
            serde_json::json!({
                "title": format!("Part {}", i + 1),
                "questions": [{
                    "id": format!("{}-q{}", id, i),
                    "text": "Pick one",
                    "options": [
                        { "id": "a", "text": "Yes" },
                        { "id": "b", "text": "No" }
                    ],
                    "correct_answers": ["a"]
                }]
            })
        })
        .collect();

    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": format!("Exam {}", id),
        "content": "Reading comprehension",
        "author_id": author_id,
        "parts": parts,
    }))
    .expect("stored exam fixture should deserialize")
}
