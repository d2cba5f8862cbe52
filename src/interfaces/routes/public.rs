use actix_web::web;

use crate::handlers::{content, projects, seo};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/{locale}")
            .service(web::resource("/projects").route(web::get().to(projects::list_projects)))
            .service(web::resource("/projects/{key}").route(web::get().to(projects::get_project)))
            .service(web::resource("/projects/{key}/switch").route(web::get().to(projects::switch_project)))
            .service(web::resource("/projects/{key}/metadata").route(web::get().to(seo::project_metadata)))
            .service(web::resource("/switch").route(web::get().to(projects::switch_path)))
            .service(web::resource("/metadata").route(web::get().to(seo::page_metadata)))
            .service(web::resource("/content/{section}").route(web::get().to(content::get_section))),
    );
}
