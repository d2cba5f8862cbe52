use actix_web::web;

use crate::{
    handlers::{admin_projects, contact, content, system},
    middlewares::auth::AuthMiddleware,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(AuthMiddleware)
            .service(web::resource("/health").route(web::get().to(system::health_check)))
            .service(
                web::resource("/projects/{locale}")
                    .route(web::get().to(admin_projects::list_projects))
                    .route(web::post().to(admin_projects::create_project)),
            )
            // Registered before `{key}`; a project slugged "order" is only
            // reachable through its originalId here.
            .service(
                web::resource("/projects/{locale}/order")
                    .route(web::put().to(admin_projects::reorder_projects)),
            )
            .service(
                web::resource("/projects/{locale}/{key}")
                    .route(web::get().to(admin_projects::get_project))
                    .route(web::patch().to(admin_projects::update_project))
                    .route(web::delete().to(admin_projects::delete_project)),
            )
            .service(web::resource("/content/{locale}").route(web::put().to(content::upsert_section)))
            .service(web::resource("/contact").route(web::get().to(contact::list_messages)))
            .service(web::resource("/contact/{id}/read").route(web::patch().to(contact::mark_read)))
            .service(web::resource("/contact/{id}").route(web::delete().to(contact::delete_message))),
    );
}
