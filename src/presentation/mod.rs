pub mod handlers;
pub mod templates;
pub mod views;
