use actix_web::{get, web};
use maud::Markup;
use tracing::info;

use crate::application::page_service::PageService;
use crate::data::blog_repository::PostgresBlogRepository;
use crate::domain::error::DomainError;
use crate::presentation::templates;

type Pages = web::Data<PageService<PostgresBlogRepository>>;

#[get("/")]
async fn home(pages: Pages) -> Result<Markup, DomainError> {
    let ctx = pages.home().await?;
    info!(
        fresh = ctx.page_posts.len(),
        popular = ctx.most_popular_posts.len(),
        "home page rendered"
    );
    Ok(templates::home(&ctx))
}

#[get("/posts/{slug}/")]
async fn post_detail(pages: Pages, path: web::Path<String>) -> Result<Markup, DomainError> {
    let slug = path.into_inner();
    let ctx = pages.post_detail(&slug).await?;
    info!(slug = %slug, comments = ctx.post.comments.len(), "post detail rendered");
    Ok(templates::post_detail(&ctx))
}

#[get("/tags/{title}/")]
async fn tag_filter(pages: Pages, path: web::Path<String>) -> Result<Markup, DomainError> {
    let title = path.into_inner();
    let ctx = pages.tag_filter(&title).await?;
    info!(tag = %title, posts = ctx.posts.len(), "tag page rendered");
    Ok(templates::posts_list(&ctx))
}

#[get("/contacts/")]
async fn contacts() -> Markup {
    templates::contacts()
}
