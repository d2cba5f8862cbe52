use std::collections::HashMap;

use actix_web::{get, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{locale::Locale, seo::SitePage},
    errors::AppError,
    AppState,
};

#[instrument(skip(state))]
pub async fn project_metadata(
    path: web::Path<(Locale, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (locale, key) = path.into_inner();

    let metadata = state.seo_handler.project_metadata(locale, &key).await?;
    Ok(HttpResponse::Ok().json(metadata))
}

#[instrument(skip(state, query))]
pub async fn page_metadata(
    locale: web::Path<Locale>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let page = match query.get("page") {
        Some(name) => name.parse::<SitePage>()?,
        None => SitePage::default(),
    };

    let metadata = state.seo_handler.page_metadata(locale.into_inner(), page);
    Ok(HttpResponse::Ok().json(metadata))
}

#[get("/sitemap.xml")]
pub async fn sitemap(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let xml = state.seo_handler.sitemap().await?;

    Ok(HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(xml))
}
