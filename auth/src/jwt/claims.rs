use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenError;

/// Token type reported alongside every issued access token.
pub const BEARER: &str = "bearer";

/// Issued access token in its wire shape.
///
/// Serializes to `{"access_token": "...", "token_type": "bearer"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: BEARER.to_string(),
        }
    }
}

/// Claims as they are signed into the token payload.
///
/// Only the subject and the validity window are carried; role and email are
/// looked up again on every verification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub(crate) struct WireClaims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl WireClaims {
    pub(crate) fn new(
        subject: Uuid,
        issued_at: DateTime<Utc>,
        expires_in: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at.checked_add_signed(expires_in).ok_or_else(|| {
            TokenError::EncodingFailed("expiry is outside the representable range".to_string())
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}

/// Verified claims extracted from a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenClaims {
    pub subject: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenClaims {
    /// Check if the claims are expired at `now`.
    ///
    /// A token is expired from the instant `expires_at` is reached.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expires_at.timestamp()
    }
}

impl TryFrom<WireClaims> for TokenClaims {
    type Error = TokenError;

    fn try_from(claims: WireClaims) -> Result<Self, Self::Error> {
        let subject = Uuid::parse_str(&claims.sub).map_err(|_| TokenError::Invalid)?;
        let issued_at = DateTime::<Utc>::from_timestamp(claims.iat, 0).ok_or(TokenError::Invalid)?;
        let expires_at = DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(TokenError::Invalid)?;

        Ok(Self {
            subject,
            issued_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_claims_window() {
        let now = Utc::now();
        let claims = WireClaims::new(Uuid::new_v4(), now, Duration::minutes(30)).unwrap();

        assert_eq!(claims.iat, now.timestamp());
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_wire_claims_expiry_overflow() {
        let result = WireClaims::new(Uuid::new_v4(), DateTime::<Utc>::MAX_UTC, Duration::minutes(30));

        assert!(matches!(result, Err(TokenError::EncodingFailed(_))));
    }

    #[test]
    fn test_try_from_rejects_non_uuid_subject() {
        let claims = WireClaims {
            sub: "user123".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_001_800,
        };

        assert_eq!(TokenClaims::try_from(claims), Err(TokenError::Invalid));
    }

    #[test]
    fn test_is_expired() {
        let subject = Uuid::new_v4();
        let claims = TokenClaims::try_from(WireClaims {
            sub: subject.to_string(),
            iat: 1000,
            exp: 2000,
        })
        .unwrap();

        assert_eq!(claims.subject, subject);
        assert!(!claims.is_expired(DateTime::<Utc>::from_timestamp(1999, 0).unwrap()));
        assert!(claims.is_expired(DateTime::<Utc>::from_timestamp(2000, 0).unwrap()));
        assert!(claims.is_expired(DateTime::<Utc>::from_timestamp(2001, 0).unwrap()));
    }

    #[test]
    fn test_token_wire_shape() {
        let token = Token::bearer("abc.def.ghi".to_string());
        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"access_token": "abc.def.ghi", "token_type": "bearer"})
        );
    }
}
