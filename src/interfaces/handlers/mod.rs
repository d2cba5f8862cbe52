use std::collections::HashMap;

pub mod admin_projects;
pub mod auth;
pub mod contact;
pub mod content;
pub mod home;
pub mod projects;
pub mod seo;
pub mod system;

const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 100;

/// `page` and `per_page` from the query string, 1-based and capped.
pub(crate) fn pagination(query: &HashMap<String, String>) -> (u32, u32) {
    let page = query
        .get("page")
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let per_page = query
        .get("per_page")
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(DEFAULT_PER_PAGE)
        .min(MAX_PER_PAGE);

    (page, per_page)
}
