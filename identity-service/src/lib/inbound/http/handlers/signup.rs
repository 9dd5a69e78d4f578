use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::IdentityData;
use crate::domain::identity::models::EmailAddress;
use crate::domain::identity::models::RegisterCommand;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityServicePort;
use crate::identity::errors::EmailError;
use crate::identity::errors::RoleError;
use crate::inbound::http::router::AppState;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<IdentityData>, ApiError> {
    state
        .identity_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref identity| ApiSuccess::new(StatusCode::CREATED, identity.into()))
}

/// HTTP request body for registering an identity (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    name: String,
    email: String,
    password: String,
    role: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),
}

impl SignupRequest {
    fn try_into_command(self) -> Result<RegisterCommand, ParseSignupRequestError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ParseSignupRequestError::EmptyName);
        }
        if self.password.is_empty() {
            return Err(ParseSignupRequestError::EmptyPassword);
        }

        let email = EmailAddress::new(self.email)?;
        let role = self.role.as_deref().map(str::parse::<Role>).transpose()?;

        Ok(RegisterCommand::new(name, email, self.password, role))
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, email: &str, password: &str, role: Option<&str>) -> SignupRequest {
        SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request("Foo", "foo@example.com", "secret", Some("USER"))
            .try_into_command()
            .unwrap();

        assert_eq!(command.name, "Foo");
        assert_eq!(command.email.as_str(), "foo@example.com");
        assert_eq!(command.role, Some(Role::User));
    }

    #[test]
    fn test_role_is_optional() {
        let command = request("Foo", "foo@example.com", "secret", None)
            .try_into_command()
            .unwrap();

        assert_eq!(command.role, None);
    }

    #[test]
    fn test_rejects_invalid_fields() {
        assert!(matches!(
            request(" ", "foo@example.com", "secret", None).try_into_command(),
            Err(ParseSignupRequestError::EmptyName)
        ));
        assert!(matches!(
            request("Foo", "foo@example.com", "", None).try_into_command(),
            Err(ParseSignupRequestError::EmptyPassword)
        ));
        assert!(matches!(
            request("Foo", "not-an-email", "secret", None).try_into_command(),
            Err(ParseSignupRequestError::Email(_))
        ));
        assert!(matches!(
            request("Foo", "foo@example.com", "secret", Some("root")).try_into_command(),
            Err(ParseSignupRequestError::Role(_))
        ));
    }
}
