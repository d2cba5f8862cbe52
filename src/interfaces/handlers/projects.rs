use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::locale::Locale, errors::AppError, handlers::pagination, AppState};

pub const RESOLVED_BY_HEADER: &str = "X-Resolved-By";

#[instrument(skip(state, query))]
pub async fn list_projects(
    locale: web::Path<Locale>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let (page, per_page) = pagination(&query);

    let projects = state
        .project_handler
        .list_public_projects(locale.into_inner(), page, per_page)
        .await?;

    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(state))]
pub async fn get_project(
    path: web::Path<(Locale, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (locale, key) = path.into_inner();

    let (project, resolved_by) = state.project_handler.get_public_project(locale, &key).await?;

    Ok(HttpResponse::Ok()
        .insert_header((RESOLVED_BY_HEADER, resolved_by.as_str()))
        .json(project))
}

#[instrument(skip(state))]
pub async fn switch_project(
    path: web::Path<(Locale, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (locale, key) = path.into_inner();

    let target = state.switcher.switch_project(locale, &key).await?;
    Ok(HttpResponse::Ok().json(target))
}

#[instrument(skip(state, query))]
pub async fn switch_path(
    locale: web::Path<Locale>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let path = query
        .get("path")
        .ok_or_else(|| AppError::InvalidInput("Query parameter 'path' is required".into()))?;

    let target = state.switcher.switch_path(locale.into_inner(), path).await?;
    Ok(HttpResponse::Ok().json(target))
}
