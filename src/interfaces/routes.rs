use actix_web::web;

use crate::handlers::{home::home, seo::sitemap};

mod admin;
mod auth;
mod contact;
mod json_error;
mod public;

/// Static scopes are registered before the `/{locale}` scope so that a
/// segment like `admin` is never taken for a locale.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home).service(sitemap);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(admin::config_routes)
            .configure(contact::config_routes)
            .configure(public::config_routes),
    );

    cfg.configure(json_error::config_routes);
}
