use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::{
        locale::Locale,
        project::{NewProjectRequest, ReorderProjectsRequest, UpdateProjectRequest},
    },
    errors::AppError,
    handlers::{pagination, projects::RESOLVED_BY_HEADER},
    use_cases::extractors::AdminClaims,
    AppState,
};

#[instrument(skip(_claims, state, query))]
pub async fn list_projects(
    _claims: AdminClaims,
    locale: web::Path<Locale>,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let (page, per_page) = pagination(&query);

    let projects = state
        .project_handler
        .list_admin_projects(locale.into_inner(), page, per_page)
        .await?;

    Ok(HttpResponse::Ok().json(projects))
}

#[instrument(skip(_claims, state, data))]
pub async fn create_project(
    _claims: AdminClaims,
    locale: web::Path<Locale>,
    state: web::Data<AppState>,
    data: web::Json<NewProjectRequest>,
) -> Result<impl Responder, AppError> {
    let project = state
        .project_handler
        .create_project(locale.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn get_project(
    _claims: AdminClaims,
    path: web::Path<(Locale, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (locale, key) = path.into_inner();

    let resolution = state.project_handler.get_admin_project(locale, &key).await?;

    Ok(HttpResponse::Ok()
        .insert_header((RESOLVED_BY_HEADER, resolution.resolved_by.as_str()))
        .json(resolution.project))
}

#[instrument(skip(_claims, state, data))]
pub async fn update_project(
    _claims: AdminClaims,
    path: web::Path<(Locale, String)>,
    state: web::Data<AppState>,
    data: web::Json<UpdateProjectRequest>,
) -> Result<impl Responder, AppError> {
    let (locale, key) = path.into_inner();

    let project = state
        .project_handler
        .update_project(locale, &key, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(project))
}

#[instrument(skip(_claims, state))]
pub async fn delete_project(
    _claims: AdminClaims,
    path: web::Path<(Locale, String)>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let (locale, key) = path.into_inner();

    let report = state.project_handler.delete_project(locale, &key).await?;
    Ok(HttpResponse::Ok().json(report))
}

#[instrument(skip(_claims, state, data))]
pub async fn reorder_projects(
    _claims: AdminClaims,
    locale: web::Path<Locale>,
    state: web::Data<AppState>,
    data: web::Json<ReorderProjectsRequest>,
) -> Result<impl Responder, AppError> {
    let report = state
        .project_handler
        .reorder_projects(locale.into_inner(), data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(report))
}
