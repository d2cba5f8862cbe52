pub mod auth;
pub mod contact;
pub mod content;
pub mod extractors;
pub mod linker;
pub mod projects;
pub mod resolver;
pub mod seo;
pub mod switcher;
