//! View models handed to the page templates. Building them is pure: no
//! queries, no side effects — everything needed is already on the
//! read-models the repository returns.

use chrono::{DateTime, Utc};

use crate::domain::comment::Comment;
use crate::domain::post::Post;
use crate::domain::tag::Tag;

const TEASER_LEN: usize = 200;

#[derive(Debug, Clone)]
pub struct TagSummary {
    pub title: String,
    pub posts_with_tag: i64,
}

impl TagSummary {
    pub fn from_tag(tag: &Tag) -> Self {
        Self {
            title: tag.title.clone(),
            posts_with_tag: tag.posts_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CommentView {
    pub text: String,
    pub published_at: DateTime<Utc>,
    pub author: String,
}

impl CommentView {
    pub fn from_comment(comment: &Comment) -> Self {
        Self {
            text: comment.text.clone(),
            published_at: comment.published_at,
            author: comment.author.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostSummary {
    pub title: String,
    pub teaser_text: String,
    pub author: String,
    pub comments_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagSummary>,
    /// `None` for a post with no tags.
    pub first_tag_title: Option<String>,
}

impl PostSummary {
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            teaser_text: teaser(&post.text),
            author: post.author.clone(),
            comments_amount: post.comments_count,
            image_url: post.image_url.clone(),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags: post.tags.iter().map(TagSummary::from_tag).collect(),
            first_tag_title: post.tags.first().map(|t| t.title.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostDetail {
    pub title: String,
    pub text: String,
    pub author: String,
    pub comments: Vec<CommentView>,
    pub likes_amount: i64,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub slug: String,
    pub tags: Vec<TagSummary>,
}

impl PostDetail {
    pub fn from_post(post: &Post, comments: &[Comment]) -> Self {
        Self {
            title: post.title.clone(),
            text: post.text.clone(),
            author: post.author.clone(),
            comments: comments.iter().map(CommentView::from_comment).collect(),
            likes_amount: post.likes_count,
            image_url: post.image_url.clone(),
            published_at: post.published_at,
            slug: post.slug.clone(),
            tags: post.tags.iter().map(TagSummary::from_tag).collect(),
        }
    }
}

/// First 200 characters of the body, or the whole body if shorter.
/// Counted in characters, not bytes, so multi-byte text never splits.
fn teaser(text: &str) -> String {
    text.chars().take(TEASER_LEN).collect()
}

// Per-page contexts; one strongly-typed struct per template instead of a
// loose key/value mapping.

#[derive(Debug, Clone)]
pub struct HomeContext {
    pub most_popular_posts: Vec<PostSummary>,
    pub page_posts: Vec<PostSummary>,
    pub popular_tags: Vec<TagSummary>,
}

#[derive(Debug, Clone)]
pub struct PostDetailContext {
    pub post: PostDetail,
    pub popular_tags: Vec<TagSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}

#[derive(Debug, Clone)]
pub struct TagFilterContext {
    pub tag: String,
    pub popular_tags: Vec<TagSummary>,
    pub posts: Vec<PostSummary>,
    pub most_popular_posts: Vec<PostSummary>,
}
