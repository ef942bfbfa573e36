use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use maud::html;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("post not found: {0}")]
    PostNotFound(String),
    #[error("tag not found: {0}")]
    TagNotFound(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::PostNotFound(_) | DomainError::TagNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            DomainError::PostNotFound(slug) => format!("No post with slug \"{slug}\""),
            DomainError::TagNotFound(title) => format!("No tag titled \"{title}\""),
            DomainError::Internal(_) => "Something went wrong on our side".to_string(),
        };
        let page = html! {
            (maud::DOCTYPE)
            html lang="en" {
                head { title { (status.as_u16()) } }
                body {
                    h1 { (status.as_u16()) " " (status.canonical_reason().unwrap_or("")) }
                    p { (message) }
                    a href="/" { "Back to the blog" }
                }
            }
        };
        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(page.into_string())
    }
}
