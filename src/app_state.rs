use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{ExamRepository, MongoExamRepository},
    services::exam_service::ExamService,
};

#[derive(Clone)]
pub struct AppState {
    pub exam_service: Arc<ExamService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let exam_repository = Arc::new(MongoExamRepository::new(&db, &config.exams_collection));
        exam_repository.ensure_indexes().await?;

        Ok(Self::with_repository(config, exam_repository))
    }

    /// Builds the state around any repository implementation.
    pub fn with_repository(config: Config, exam_repository: Arc<dyn ExamRepository>) -> Self {
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.jwt_expiration_hours,
        ));

        Self {
            exam_service: Arc::new(ExamService::new(exam_repository)),
            jwt_service,
        }
    }
}
