use actix_web::{post, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::token::LoginRequest, errors::AuthError, AppState};

#[post("/login")]
#[instrument(skip(state, credentials))]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginRequest>,
) -> Result<impl Responder, AuthError> {
    let response = state.auth_handler.login(credentials.into_inner())?;
    Ok(HttpResponse::Ok().json(response))
}
