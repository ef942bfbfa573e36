mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};

use crate::application::page_service::PageService;
use crate::data::blog_repository::PostgresBlogRepository;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::{create_pool, run_migrations};
use crate::infrastructure::logging::init_logging;
use crate::presentation::handlers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let repo = Arc::new(PostgresBlogRepository::new(pool));
    let pages = PageService::new(repo);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(pages.clone()))
            .service(handlers::pages::home)
            .service(handlers::pages::post_detail)
            .service(handlers::pages::tag_filter)
            .service(handlers::pages::contacts)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
