use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use uuid::Uuid;

use super::claims::Token;
use super::claims::TokenClaims;
use super::claims::WireClaims;
use super::errors::TokenError;

/// Signs and verifies expiring identity tokens.
///
/// Tokens are JWTs signed with a shared secret using one of the HMAC
/// algorithms. The payload carries only the subject identifier and the
/// validity window.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    permitted: Vec<Algorithm>,
    expires_in: Duration,
}

impl TokenCodec {
    /// Longest token lifetime accepted, one year.
    pub const MAX_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

    /// Create a new codec.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens
    /// * `algorithm` - HMAC algorithm used to sign; also the only algorithm accepted on verify
    /// * `expire_minutes` - Lifetime of every issued token
    ///
    /// # Errors
    /// * `UnsupportedAlgorithm` - Algorithm is not one of HS256, HS384, HS512
    /// * `InvalidLifetime` - `expire_minutes` is negative or above `MAX_EXPIRE_MINUTES`
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8], algorithm: Algorithm, expire_minutes: i64) -> Result<Self, TokenError> {
        if !is_hmac(algorithm) {
            return Err(TokenError::UnsupportedAlgorithm(format!("{:?}", algorithm)));
        }
        if !(0..=Self::MAX_EXPIRE_MINUTES).contains(&expire_minutes) {
            return Err(TokenError::InvalidLifetime(expire_minutes));
        }
        let expires_in = Duration::try_minutes(expire_minutes)
            .ok_or(TokenError::InvalidLifetime(expire_minutes))?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            permitted: vec![algorithm],
            expires_in,
        })
    }

    /// Create a codec from an algorithm name such as `"HS256"`.
    pub fn from_algorithm_name(
        secret: &[u8],
        algorithm: &str,
        expire_minutes: i64,
    ) -> Result<Self, TokenError> {
        let algorithm = parse_algorithm(algorithm)?;
        Self::new(secret, algorithm, expire_minutes)
    }

    /// Issue a bearer token for `subject`, valid from now for the configured window.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, subject: Uuid) -> Result<Token, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a bearer token as if the current time were `now`.
    pub fn issue_at(&self, subject: Uuid, now: DateTime<Utc>) -> Result<Token, TokenError> {
        let claims = WireClaims::new(subject, now, self.expires_in)?;
        let header = Header::new(self.algorithm);

        encode(&header, &claims, &self.encoding_key)
            .map(Token::bearer)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `Invalid` - Signature invalid, payload unparseable, subject missing or
    ///   not an identifier, or the token has expired
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = self.permitted.clone();
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);
        // Expiry is checked below against `now`, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        let token_data = decode::<WireClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(reason = %e, "Token rejected");
                TokenError::Invalid
            })?;

        let claims = TokenClaims::try_from(token_data.claims)?;

        if claims.is_expired(now) {
            tracing::debug!(subject = %claims.subject, "Token rejected: expired");
            return Err(TokenError::Invalid);
        }

        Ok(claims)
    }
}

/// Parse an HMAC algorithm name (`HS256`, `HS384`, `HS512`).
pub fn parse_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    Algorithm::from_str(name)
        .ok()
        .filter(|algorithm| is_hmac(*algorithm))
        .ok_or_else(|| TokenError::UnsupportedAlgorithm(name.to_string()))
}

fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}
