use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub movie_id: String,
    pub text: String,
    #[serde(default)]
    pub spoiler: bool, // Fixed at creation
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the `reviews` table. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewReview {
    pub movie_id: String,
    pub text: String,
    pub spoiler: bool,
}
