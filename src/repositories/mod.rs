pub mod exam_repository;

#[cfg(test)]
pub use exam_repository::MockExamRepository;
pub use exam_repository::{ExamRepository, MongoExamRepository};
