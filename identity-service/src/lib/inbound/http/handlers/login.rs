use auth::Token;
use axum::extract::State;
use axum::Form;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::domain::identity::models::Credential;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// OAuth2 password-grant form. `username` carries the email address.
#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// Exchanges email and password for a bearer token.
///
/// Responds with the bare token object, `{"access_token": ..., "token_type": "bearer"}`.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<Token>, ApiError> {
    let email = EmailAddress::new(form.username)
        .map_err(|_| ApiError::BadRequest("Not a valid email".to_string()))?;

    state
        .identity_service
        .login(Credential::new(email, form.password))
        .await
        .map(Json)
        .map_err(ApiError::from)
}
