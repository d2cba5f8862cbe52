use actix_web::{get, web, HttpResponse, Responder};

use crate::{entities::locale::Locale, AppState};

#[get("/")]
pub async fn home(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Welcome to the {} API!", state.project_handler.site().site_name),
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "locales": Locale::ALL,
        "defaultLocale": Locale::default(),
        "sitemap": "/sitemap.xml"
    }))
}
