pub mod contact;
pub mod content;
pub mod image_store;
pub mod project;
pub mod sqlx_repo;
