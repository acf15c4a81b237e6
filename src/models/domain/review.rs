use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, SimpleObject)]
pub struct Review {
    pub id: String,
    pub user_id: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(user_id: &str, rating: i32, comment: &str) -> Self {
        Review {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            rating,
            comment: comment.to_string(),
            created_at: Utc::now(),
        }
    }
}
