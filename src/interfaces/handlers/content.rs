use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{locale::Locale, site_content::SiteSection},
    errors::AppError,
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(state))]
pub async fn get_section(
    path: web::Path<(Locale, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (locale, section) = path.into_inner();

    let content = state.content_handler.get_section(locale, &section).await?;
    Ok(HttpResponse::Ok().json(content))
}

#[instrument(skip(_claims, state, data))]
pub async fn upsert_section(
    _claims: AdminClaims,
    locale: web::Path<Locale>,
    state: web::Data<AppState>,
    data: web::Json<SiteSection>,
) -> Result<impl Responder, AppError> {
    let content = state
        .content_handler
        .upsert_section(locale.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(content))
}
