//! Maud page templates: home, post-detail, posts-list, contacts.
//! Compile-time HTML instead of a runtime template directory, so a missing
//! context field is a build error and all interpolation is escaped.

use chrono::{DateTime, Utc};
use maud::{DOCTYPE, Markup, html};

use crate::presentation::views::{
    HomeContext, PostDetailContext, PostSummary, TagFilterContext, TagSummary,
};

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                title { (title) }
            }
            body {
                header {
                    nav {
                        a href="/" { "Blog" }
                        " | "
                        a href="/contacts/" { "Contacts" }
                    }
                }
                main { (content) }
            }
        }
    }
}

fn published(at: &DateTime<Utc>) -> Markup {
    html! {
        time datetime=(at.to_rfc3339()) { (at.format("%d.%m.%Y")) }
    }
}

fn tag_links(tags: &[TagSummary]) -> Markup {
    html! {
        ul class="tags" {
            @for tag in tags {
                li {
                    a href={ "/tags/" (tag.title) "/" } {
                        (tag.title) " (" (tag.posts_with_tag) ")"
                    }
                }
            }
        }
    }
}

fn post_card(post: &PostSummary) -> Markup {
    html! {
        article class="post-card" {
            h2 { a href={ "/posts/" (post.slug) "/" } { (post.title) } }
            @if let Some(url) = &post.image_url {
                img src=(url) alt=(post.title);
            }
            p class="teaser" { (post.teaser_text) }
            footer {
                span class="author" { (post.author) }
                " · "
                (published(&post.published_at))
                " · "
                span class="comments" { (post.comments_amount) " comments" }
                @if let Some(first_tag) = &post.first_tag_title {
                    " · "
                    a href={ "/tags/" (first_tag) "/" } { (first_tag) }
                }
            }
            (tag_links(&post.tags))
        }
    }
}

fn sidebar(popular_posts: &[PostSummary], popular_tags: &[TagSummary]) -> Markup {
    html! {
        aside {
            section class="popular-posts" {
                h3 { "Popular posts" }
                ul {
                    @for post in popular_posts {
                        li { a href={ "/posts/" (post.slug) "/" } { (post.title) } }
                    }
                }
            }
            section class="popular-tags" {
                h3 { "Popular tags" }
                (tag_links(popular_tags))
            }
        }
    }
}

pub fn home(ctx: &HomeContext) -> Markup {
    layout(
        "Blog",
        html! {
            section class="fresh-posts" {
                h1 { "Fresh posts" }
                @for post in &ctx.page_posts {
                    (post_card(post))
                }
            }
            (sidebar(&ctx.most_popular_posts, &ctx.popular_tags))
        },
    )
}

pub fn post_detail(ctx: &PostDetailContext) -> Markup {
    let post = &ctx.post;
    layout(
        &post.title,
        html! {
            article class="post" {
                h1 { (post.title) }
                @if let Some(url) = &post.image_url {
                    img src=(url) alt=(post.title);
                }
                p class="meta" {
                    (post.author) " · " (published(&post.published_at))
                    " · " (post.likes_amount) " likes"
                    " · " a href={ "/posts/" (post.slug) "/" } { "permalink" }
                }
                (tag_links(&post.tags))
                div class="body" { (post.text) }
            }
            section class="comments" {
                h2 { (post.comments.len()) " comments" }
                @for comment in &post.comments {
                    article class="comment" {
                        p { (comment.text) }
                        footer { (comment.author) " · " (published(&comment.published_at)) }
                    }
                }
            }
            (sidebar(&ctx.most_popular_posts, &ctx.popular_tags))
        },
    )
}

pub fn posts_list(ctx: &TagFilterContext) -> Markup {
    layout(
        &ctx.tag,
        html! {
            section class="tagged-posts" {
                h1 { "Posts tagged \"" (ctx.tag) "\"" }
                @if ctx.posts.is_empty() {
                    p { "Nothing here yet." }
                }
                @for post in &ctx.posts {
                    (post_card(post))
                }
            }
            (sidebar(&ctx.most_popular_posts, &ctx.popular_tags))
        },
    )
}

// Placeholder page; visit statistics and a feedback form may land here later.
pub fn contacts() -> Markup {
    layout(
        "Contacts",
        html! {
            h1 { "Contacts" }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::views::PostDetail;

    fn summary(title: &str, slug: &str) -> PostSummary {
        PostSummary {
            title: title.into(),
            teaser_text: "teaser".into(),
            author: "alice".into(),
            comments_amount: 1,
            image_url: None,
            published_at: Utc::now(),
            slug: slug.into(),
            tags: vec![TagSummary {
                title: "rust".into(),
                posts_with_tag: 2,
            }],
            first_tag_title: Some("rust".into()),
        }
    }

    #[test]
    fn home_lists_fresh_posts_and_sidebar() {
        let ctx = HomeContext {
            most_popular_posts: vec![summary("Top Post", "top-post")],
            page_posts: vec![summary("Latest Post", "latest-post")],
            popular_tags: vec![TagSummary {
                title: "rust".into(),
                posts_with_tag: 2,
            }],
        };
        let page = home(&ctx).into_string();
        assert!(page.contains("Latest Post"));
        assert!(page.contains("Top Post"));
        assert!(page.contains("/tags/rust/"));
    }

    #[test]
    fn detail_renders_body_and_comments() {
        let ctx = PostDetailContext {
            post: PostDetail {
                title: "Hello World".into(),
                text: "full body".into(),
                author: "alice".into(),
                comments: vec![comment("first!", "bob")],
                likes_amount: 9,
                image_url: Some("/media/pic.png".into()),
                published_at: Utc::now(),
                slug: "hello-world".into(),
                tags: vec![],
            },
            popular_tags: vec![],
            most_popular_posts: vec![],
        };
        let page = post_detail(&ctx).into_string();
        assert!(page.contains("Hello World"));
        assert!(page.contains("full body"));
        assert!(page.contains("first!"));
        assert!(page.contains("/media/pic.png"));
    }

    #[test]
    fn markup_escapes_user_content() {
        let mut ctx = HomeContext {
            most_popular_posts: vec![],
            page_posts: vec![summary("<script>alert(1)</script>", "xss")],
            popular_tags: vec![],
        };
        ctx.page_posts[0].teaser_text = "<b>bold</b>".into();
        let page = home(&ctx).into_string();
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn contacts_page_is_static() {
        let page = contacts().into_string();
        assert!(page.contains("Contacts"));
    }

    fn comment(text: &str, author: &str) -> crate::presentation::views::CommentView {
        crate::presentation::views::CommentView {
            text: text.into(),
            published_at: Utc::now(),
            author: author.into(),
        }
    }
}
