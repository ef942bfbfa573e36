use chrono::{DateTime, Utc};

/// A comment on a post, with the author username already joined.
#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}
