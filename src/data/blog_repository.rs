use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::error;
use uuid::Uuid;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::domain::tag::Tag;

/// Read-side store handle. Every list operation returns fully-materialized
/// rows: author username joined, like/comment counts aggregated, and tags
/// (with their post counts) batch-fetched in a single follow-up query for
/// the whole result set.
///
/// "Popular" orderings are total: descending count first, ascending id as
/// the tie-break, so page content is stable across requests.
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Posts ordered by like count. Returns at most `limit` rows.
    async fn popular_posts(&self, limit: i64) -> Result<Vec<Post>, DomainError>;
    /// Posts ordered by publish timestamp, newest first.
    async fn fresh_posts(&self, limit: i64) -> Result<Vec<Post>, DomainError>;
    /// Tags ordered by how many posts carry them.
    async fn popular_tags(&self, limit: i64) -> Result<Vec<Tag>, DomainError>;
    /// Posts carrying the given tag, in popularity order.
    async fn posts_for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<Post>, DomainError>;
    /// Exactly one post, or `PostNotFound`.
    async fn post_by_slug(&self, slug: &str) -> Result<Post, DomainError>;
    /// Exact-title lookup, or `TagNotFound`.
    async fn tag_by_title(&self, title: &str) -> Result<Tag, DomainError>;
    /// Comments for one post with authors joined, oldest first.
    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresBlogRepository {
    pool: PgPool,
}

impl PostgresBlogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One `ANY($1)` query loads the tags for the whole result set, so a
    /// page of N posts costs two round trips, not N + 1.
    async fn attach_tags(&self, rows: Vec<PostRow>) -> Result<Vec<Post>, DomainError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut tags_by_post: HashMap<Uuid, Vec<Tag>> = HashMap::new();

        if !ids.is_empty() {
            let tag_rows = sqlx::query(
                r#"
                SELECT pt.post_id, t.id, t.title,
                       (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
                FROM post_tags pt
                JOIN tags t ON t.id = pt.tag_id
                WHERE pt.post_id = ANY($1)
                ORDER BY pt.post_id, t.id
                "#,
            )
            .bind(&ids[..])
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching tags for posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;

            for row in tag_rows {
                let post_id: Uuid = row.get("post_id");
                tags_by_post.entry(post_id).or_default().push(Tag {
                    id: row.get("id"),
                    title: row.get("title"),
                    posts_count: row.get("posts_count"),
                });
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_post.remove(&row.id).unwrap_or_default();
                row.into_post(tags)
            })
            .collect())
    }
}

/// Flat row shape for the aggregate post queries; tags are attached
/// separately by `attach_tags`.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    text: String,
    slug: String,
    image_url: Option<String>,
    published_at: DateTime<Utc>,
    author: String,
    likes_count: i64,
    comments_count: i64,
}

impl PostRow {
    fn into_post(self, tags: Vec<Tag>) -> Post {
        Post {
            id: self.id,
            title: self.title,
            text: self.text,
            slug: self.slug,
            image_url: self.image_url,
            published_at: self.published_at,
            author: self.author,
            likes_count: self.likes_count,
            comments_count: self.comments_count,
            tags,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TagRow {
    id: Uuid,
    title: String,
    posts_count: i64,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            id: row.id,
            title: row.title,
            posts_count: row.posts_count,
        }
    }
}

const POST_COLUMNS: &str = r#"
    p.id, p.title, p.text, p.slug, p.image_url, p.published_at,
    u.username AS author,
    (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS likes_count,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count
"#;

#[async_trait]
impl BlogRepository for PostgresBlogRepository {
    async fn popular_posts(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY likes_count DESC, p.id
            LIMIT $1
            "#
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching popular posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        self.attach_tags(rows).await
    }

    async fn fresh_posts(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.published_at DESC, p.id
            LIMIT $1
            "#
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching fresh posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        self.attach_tags(rows).await
    }

    async fn popular_tags(&self, limit: i64) -> Result<Vec<Tag>, DomainError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT t.id, t.title,
                   (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
            FROM tags t
            ORDER BY posts_count DESC, t.id
            LIMIT $1
            "#,
        )
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching popular tags: {}", e);
            DomainError::Internal(e.to_string())
        })?;

        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn posts_for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<Post>, DomainError> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            JOIN post_tags pt ON pt.post_id = p.id
            WHERE pt.tag_id = $1
            ORDER BY likes_count DESC, p.id
            LIMIT $2
            "#
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(tag_id)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching posts for tag {}: {}", tag_id, e);
                DomainError::Internal(e.to_string())
            })?;
        self.attach_tags(rows).await
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.slug = $1
            "#
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while fetching post {}: {}", slug, e);
                DomainError::Internal(e.to_string())
            })?
            .ok_or_else(|| DomainError::PostNotFound(slug.to_string()))?;

        let mut posts = self.attach_tags(vec![row]).await?;
        Ok(posts.remove(0))
    }

    async fn tag_by_title(&self, title: &str) -> Result<Tag, DomainError> {
        sqlx::query_as::<_, TagRow>(
            r#"
            SELECT t.id, t.title,
                   (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count
            FROM tags t
            WHERE t.title = $1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching tag {}: {}", title, e);
            DomainError::Internal(e.to_string())
        })?
        .map(Tag::from)
        .ok_or_else(|| DomainError::TagNotFound(title.to_string()))
    }

    async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT c.text, c.published_at, u.username AS author
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.published_at, c.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching comments for {}: {}", post_id, e);
            DomainError::Internal(e.to_string())
        })?;

        Ok(rows
            .into_iter()
            .map(|row| Comment {
                text: row.get("text"),
                published_at: row.get("published_at"),
                author: row.get("author"),
            })
            .collect())
    }
}
