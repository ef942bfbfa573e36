use uuid::Uuid;

/// A tag together with the number of posts carrying it. The count is
/// aggregated by the repository, never fetched per row.
#[derive(Debug, Clone)]
pub struct Tag {
    pub id: Uuid,
    pub title: String,
    pub posts_count: i64,
}
