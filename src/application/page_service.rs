use std::sync::Arc;

use tracing::instrument;

use crate::data::blog_repository::BlogRepository;
use crate::domain::error::DomainError;
use crate::presentation::views::{
    HomeContext, PostDetail, PostDetailContext, PostSummary, TagFilterContext, TagSummary,
};

const SIDEBAR_LIMIT: i64 = 5;
const TAG_PAGE_LIMIT: i64 = 20;

/// One operation per page. Each call is a stateless read transaction:
/// a short sequence of repository queries folded into a typed context.
#[derive(Clone)]
pub struct PageService<R: BlogRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PageService<R>
where
    R: BlogRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn home(&self) -> Result<HomeContext, DomainError> {
        let most_popular = self.repo.popular_posts(SIDEBAR_LIMIT).await?;
        let most_fresh = self.repo.fresh_posts(SIDEBAR_LIMIT).await?;
        let popular_tags = self.repo.popular_tags(SIDEBAR_LIMIT).await?;

        Ok(HomeContext {
            most_popular_posts: most_popular.iter().map(PostSummary::from_post).collect(),
            page_posts: most_fresh.iter().map(PostSummary::from_post).collect(),
            popular_tags: popular_tags.iter().map(TagSummary::from_tag).collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn post_detail(&self, slug: &str) -> Result<PostDetailContext, DomainError> {
        let post = self.repo.post_by_slug(slug).await?;
        let comments = self.repo.comments_for_post(post.id).await?;
        let popular_tags = self.repo.popular_tags(SIDEBAR_LIMIT).await?;
        let most_popular = self.repo.popular_posts(SIDEBAR_LIMIT).await?;

        Ok(PostDetailContext {
            post: PostDetail::from_post(&post, &comments),
            popular_tags: popular_tags.iter().map(TagSummary::from_tag).collect(),
            most_popular_posts: most_popular.iter().map(PostSummary::from_post).collect(),
        })
    }

    #[instrument(skip(self))]
    pub async fn tag_filter(&self, tag_title: &str) -> Result<TagFilterContext, DomainError> {
        let tag = self.repo.tag_by_title(tag_title).await?;
        let popular_tags = self.repo.popular_tags(SIDEBAR_LIMIT).await?;
        let posts = self.repo.posts_for_tag(tag.id, TAG_PAGE_LIMIT).await?;
        let most_popular = self.repo.popular_posts(SIDEBAR_LIMIT).await?;

        Ok(TagFilterContext {
            tag: tag.title,
            popular_tags: popular_tags.iter().map(TagSummary::from_tag).collect(),
            posts: posts.iter().map(PostSummary::from_post).collect(),
            most_popular_posts: most_popular.iter().map(PostSummary::from_post).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use crate::domain::comment::Comment;
    use crate::domain::post::Post;
    use crate::domain::tag::Tag;

    /// Test double applying the same ordering contracts as the Postgres
    /// repository: count descending, id ascending on ties.
    struct InMemoryBlogRepository {
        posts: Vec<Post>,
        tags: Vec<Tag>,
        comments: Vec<(Uuid, Comment)>,
    }

    #[async_trait]
    impl BlogRepository for InMemoryBlogRepository {
        async fn popular_posts(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
            let mut posts = self.posts.clone();
            posts.sort_by(|a, b| b.likes_count.cmp(&a.likes_count).then(a.id.cmp(&b.id)));
            posts.truncate(limit.max(0) as usize);
            Ok(posts)
        }

        async fn fresh_posts(&self, limit: i64) -> Result<Vec<Post>, DomainError> {
            let mut posts = self.posts.clone();
            posts.sort_by(|a, b| b.published_at.cmp(&a.published_at).then(a.id.cmp(&b.id)));
            posts.truncate(limit.max(0) as usize);
            Ok(posts)
        }

        async fn popular_tags(&self, limit: i64) -> Result<Vec<Tag>, DomainError> {
            let mut tags = self.tags.clone();
            tags.sort_by(|a, b| b.posts_count.cmp(&a.posts_count).then(a.id.cmp(&b.id)));
            tags.truncate(limit.max(0) as usize);
            Ok(tags)
        }

        async fn posts_for_tag(&self, tag_id: Uuid, limit: i64) -> Result<Vec<Post>, DomainError> {
            let mut posts: Vec<Post> = self
                .posts
                .iter()
                .filter(|p| p.tags.iter().any(|t| t.id == tag_id))
                .cloned()
                .collect();
            posts.sort_by(|a, b| b.likes_count.cmp(&a.likes_count).then(a.id.cmp(&b.id)));
            posts.truncate(limit.max(0) as usize);
            Ok(posts)
        }

        async fn post_by_slug(&self, slug: &str) -> Result<Post, DomainError> {
            self.posts
                .iter()
                .find(|p| p.slug == slug)
                .cloned()
                .ok_or_else(|| DomainError::PostNotFound(slug.to_string()))
        }

        async fn tag_by_title(&self, title: &str) -> Result<Tag, DomainError> {
            self.tags
                .iter()
                .find(|t| t.title == title)
                .cloned()
                .ok_or_else(|| DomainError::TagNotFound(title.to_string()))
        }

        async fn comments_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
            Ok(self
                .comments
                .iter()
                .filter(|(id, _)| *id == post_id)
                .map(|(_, c)| c.clone())
                .collect())
        }
    }

    fn tag(title: &str, posts_count: i64) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            title: title.into(),
            posts_count,
        }
    }

    fn post(n: u32, slug: &str, likes: i64, tags: Vec<Tag>) -> Post {
        Post {
            id: Uuid::new_v4(),
            title: format!("Post {n}"),
            text: "lorem ipsum".repeat(40),
            slug: slug.into(),
            image_url: None,
            published_at: Utc::now() - Duration::hours(n as i64),
            author: "alice".into(),
            likes_count: likes,
            comments_count: 0,
            tags,
        }
    }

    fn service(repo: InMemoryBlogRepository) -> PageService<InMemoryBlogRepository> {
        PageService::new(Arc::new(repo))
    }

    fn seeded() -> InMemoryBlogRepository {
        let rust = tag("rust", 7);
        let web = tag("web", 3);
        let posts = (0..8)
            .map(|n| {
                post(
                    n,
                    &format!("post-{n}"),
                    i64::from(n * 10),
                    vec![rust.clone(), web.clone()],
                )
            })
            .collect();
        InMemoryBlogRepository {
            posts,
            tags: vec![rust, web, tag("lonely", 0)],
            comments: vec![],
        }
    }

    #[tokio::test]
    async fn home_caps_every_section_at_five() {
        let ctx = service(seeded()).home().await.unwrap();
        assert_eq!(ctx.most_popular_posts.len(), 5);
        assert_eq!(ctx.page_posts.len(), 5);
        assert_eq!(ctx.popular_tags.len(), 3);
    }

    #[tokio::test]
    async fn popular_posts_come_back_by_non_increasing_likes() {
        let ctx = service(seeded()).home().await.unwrap();
        let titles: Vec<&str> = ctx
            .most_popular_posts
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["Post 7", "Post 6", "Post 5", "Post 4", "Post 3"]);
    }

    #[tokio::test]
    async fn fresh_posts_come_back_newest_first() {
        let ctx = service(seeded()).home().await.unwrap();
        assert_eq!(ctx.page_posts[0].title, "Post 0");
        assert_eq!(ctx.page_posts[4].title, "Post 4");
    }

    #[tokio::test]
    async fn unknown_slug_propagates_not_found() {
        let err = service(seeded())
            .post_detail("nonexistent-slug")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn detail_includes_comments_for_that_post_only() {
        let mut repo = seeded();
        let post_id = repo.posts[0].id;
        let other_id = repo.posts[1].id;
        repo.comments = vec![
            (
                post_id,
                Comment {
                    text: "great".into(),
                    published_at: Utc::now(),
                    author: "bob".into(),
                },
            ),
            (
                other_id,
                Comment {
                    text: "elsewhere".into(),
                    published_at: Utc::now(),
                    author: "carol".into(),
                },
            ),
        ];
        let ctx = service(repo).post_detail("post-0").await.unwrap();
        assert_eq!(ctx.post.comments.len(), 1);
        assert_eq!(ctx.post.comments[0].text, "great");
    }

    #[tokio::test]
    async fn unknown_tag_propagates_not_found_not_an_empty_list() {
        let err = service(seeded())
            .tag_filter("nonexistent-tag")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::TagNotFound(_)));
    }

    #[tokio::test]
    async fn tag_page_lists_up_to_twenty_posts() {
        let rust = tag("rust", 30);
        let posts = (0..30)
            .map(|n| post(n, &format!("post-{n}"), i64::from(n), vec![rust.clone()]))
            .collect();
        let repo = InMemoryBlogRepository {
            posts,
            tags: vec![rust],
            comments: vec![],
        };
        let ctx = service(repo).tag_filter("rust").await.unwrap();
        assert_eq!(ctx.tag, "rust");
        assert_eq!(ctx.posts.len(), 20);
        assert_eq!(ctx.posts[0].title, "Post 29");
    }

    #[tokio::test]
    async fn tag_with_no_posts_renders_an_empty_page_not_an_error() {
        let ctx = service(seeded()).tag_filter("lonely").await.unwrap();
        assert!(ctx.posts.is_empty());
    }
}
