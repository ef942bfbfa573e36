pub mod blog_repository;
