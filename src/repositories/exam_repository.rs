use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions, ReplaceOptions},
    Collection, IndexModel,
};

use crate::{
    db::Database,
    errors::{AppError, AppResult},
    models::domain::Exam,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExamRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Exam>>;
    async fn list_exams(&self, offset: i64, limit: i64) -> AppResult<(Vec<Exam>, i64)>;
    async fn create(&self, exam: Exam) -> AppResult<Exam>;
    /// Replaces the whole stored document.
    async fn update(&self, exam: Exam) -> AppResult<Exam>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn health_check(&self) -> AppResult<()>;
}

pub struct MongoExamRepository {
    db: Database,
    collection: Collection<Exam>,
}

impl MongoExamRepository {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        let collection = db.get_collection(collection_name);
        Self {
            db: db.clone(),
            collection,
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!(
            "Creating indexes for {}.{}",
            self.db.db_name(),
            self.collection.name()
        );

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let author_index = IndexModel::builder()
            .keys(doc! { "author_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("author_id".to_string())
                    .build(),
            )
            .build();

        let created_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(author_index).await?;
        self.collection.create_index(created_index).await?;

        log::info!("Successfully created indexes for exams collection");
        Ok(())
    }
}

#[async_trait]
impl ExamRepository for MongoExamRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Exam>> {
        let exam = self.collection.find_one(doc! { "id": id }).await?;
        Ok(exam)
    }

    async fn list_exams(&self, offset: i64, limit: i64) -> AppResult<(Vec<Exam>, i64)> {
        let total = self.collection.count_documents(doc! {}).await? as i64;

        let find_options = FindOptions::builder()
            .skip(Some(offset as u64))
            .limit(Some(limit))
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! {})
            .with_options(find_options)
            .await?;
        let items: Vec<Exam> = cursor.try_collect().await?;

        Ok((items, total))
    }

    async fn create(&self, exam: Exam) -> AppResult<Exam> {
        self.collection.insert_one(&exam).await?;
        Ok(exam)
    }

    async fn update(&self, exam: Exam) -> AppResult<Exam> {
        let options = ReplaceOptions::builder().upsert(false).build();

        let result = self
            .collection
            .replace_one(doc! { "id": &exam.id }, &exam)
            .with_options(options)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Exam with id '{}' not found",
                exam.id
            )));
        }

        Ok(exam)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Exam with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn health_check(&self) -> AppResult<()> {
        self.db.health_check().await
    }
}
