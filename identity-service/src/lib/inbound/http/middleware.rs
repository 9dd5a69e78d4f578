use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::Role;
use crate::domain::identity::ports::IdentityServicePort;
use crate::identity::errors::IdentityError;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated identity in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity(pub Identity);

/// Middleware that resolves the bearer token to an identity and adds it to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let identity = state
        .identity_service
        .authenticate(token)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Bearer authentication failed");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(AuthenticatedIdentity(identity));

    Ok(next.run(req).await)
}

/// Middleware that lets only admins through. Must run after `authenticate`.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = req
        .extensions()
        .get::<AuthenticatedIdentity>()
        .map(|authenticated| authenticated.0.clone())
        .ok_or_else(|| ApiError::from(IdentityError::Credential))?;

    state
        .identity_service
        .authorize(identity, Role::Admin)
        .map_err(ApiError::from)?;

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let not_authenticated = || ApiError::Unauthorized("Not authenticated".to_string());

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(not_authenticated)?;

    let auth_str = auth_header.to_str().map_err(|_| not_authenticated())?;

    match auth_str.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token.trim())
        }
        _ => Err(not_authenticated()),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with(header: Option<&str>) -> Request {
        let mut builder = http::Request::builder().uri("/users/me");
        if let Some(value) = header {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_extracts_bearer_token() {
        let req = request_with(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token_from_header(&req).unwrap(), "abc.def.ghi");

        let req = request_with(Some("bearer abc.def.ghi"));
        assert_eq!(extract_token_from_header(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_rejects_missing_or_foreign_scheme() {
        for header in [None, Some("Basic Zm9vOmJhcg=="), Some("Bearer"), Some("abc")] {
            let req = request_with(header);
            assert!(matches!(
                extract_token_from_header(&req),
                Err(ApiError::Unauthorized(_))
            ));
        }
    }
}
