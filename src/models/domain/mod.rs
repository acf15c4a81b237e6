pub mod exam;
pub mod review;
pub mod score_record;
pub mod user;
pub use exam::{Exam, Part, Question, QuestionOption, QuestionType};
pub use review::Review;
pub use score_record::{LeaderboardEntry, ScoreRecord, StoredScore, QUALIFYING_SCORE};
pub use user::UserRole;
