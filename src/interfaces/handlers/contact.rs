use std::collections::HashMap;

use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::contact::ContactForm,
    errors::AppError,
    handlers::pagination,
    use_cases::extractors::AdminClaims,
    utils::get_client_ip::get_client_ip,
    AppState,
};

#[instrument(skip(req, state, form))]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, AppError> {
    let client_ip = get_client_ip(&req, state.trust_x_forwarded_for);

    let decision = state.contact_limiter.check(&client_ip);
    if !decision.allowed {
        tracing::warn!(%client_ip, "Contact form rate limit exceeded");
        return Err(AppError::TooManyRequests(decision.retry_after));
    }

    let response = state.contact_handler.submit(form.into_inner()).await?;

    Ok(HttpResponse::Created()
        .insert_header(("X-RateLimit-Remaining", decision.remaining.to_string()))
        .json(response))
}

#[instrument(skip(_claims, state, query))]
pub async fn list_messages(
    _claims: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> Result<impl Responder, AppError> {
    let (page, per_page) = pagination(&query);

    let messages = state.contact_handler.list_messages(page, per_page).await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[instrument(skip(_claims, state))]
pub async fn mark_read(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message = state.contact_handler.mark_read(&message_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip(_claims, state))]
pub async fn delete_message(
    _claims: AdminClaims,
    message_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.contact_handler.delete_message(&message_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
