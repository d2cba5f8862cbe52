use validator::Validate;
use zeroize::Zeroizing;

use crate::{
    auth::{jwt::JwtService, password::verify_password},
    entities::token::{AuthResponse, LoginRequest},
    errors::AuthError,
    settings::AppConfig,
};

/// Signs in the single site administrator configured in `AppConfig`.
pub struct AuthHandler {
    admin_email: String,
    admin_password_hash: Zeroizing<String>,
    pub token_service: JwtService,
}

impl AuthHandler {
    pub fn new(config: &AppConfig, token_service: JwtService) -> Self {
        AuthHandler {
            admin_email: config.admin_email.trim().to_lowercase(),
            admin_password_hash: Zeroizing::new(config.admin_password_hash.clone()),
            token_service,
        }
    }

    /// Checks the credentials and issues an access token.
    pub fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        request.validate()?;

        // Hash check runs even for an unknown email.
        let password_ok = verify_password(&request.password, &self.admin_password_hash)?;
        let email_ok = request.email.trim().to_lowercase() == self.admin_email;

        if !(password_ok && email_ok) {
            tracing::warn!("Rejected admin login");
            return Err(AuthError::WrongCredentials);
        }

        let access_token = self.token_service.create_jwt(&self.admin_email, true)?;

        tracing::info!("Admin logged in");
        Ok(AuthResponse::new(access_token, self.token_service.expires_in_secs()))
    }
}
