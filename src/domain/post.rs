use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::tag::Tag;

/// A fully-materialized post read-model: author username joined, like and
/// comment counts aggregated, tags attached. Produced only by the
/// repository; this service never mutates posts.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub author: String,
    pub likes_count: i64,
    pub comments_count: i64,
    pub tags: Vec<Tag>,
}
