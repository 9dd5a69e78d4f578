use uuid::Uuid;

use crate::jwt::Token;
use crate::jwt::TokenClaims;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and token handling.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `password_hasher` - Hasher used for storing and checking passwords
    /// * `token_codec` - Codec used to issue and verify tokens
    pub fn new(password_hasher: PasswordHasher, token_codec: TokenCodec) -> Self {
        Self {
            password_hasher,
            token_codec,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue a token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier the token is issued for
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash could not be parsed
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: Uuid,
    ) -> Result<Token, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.token_codec.issue(subject)?)
    }

    /// Reject a login for a subject that has no stored hash.
    ///
    /// Runs one hash with the configured work factor so the rejection costs
    /// the same as checking a real stored hash.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        if let Err(e) = self.password_hasher.hash(password) {
            tracing::debug!(error = %e, "Password work for unknown subject failed");
        }

        AuthenticationError::InvalidCredentials
    }

    /// Issue a token without password verification.
    pub fn issue_token(&self, subject: Uuid) -> Result<Token, TokenError> {
        self.token_codec.issue(subject)
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `TokenError::Invalid` - Token is malformed, mis-signed or expired
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.token_codec.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::Algorithm;

    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(
            PasswordHasher::with_params(8, 1, 1).unwrap(),
            TokenCodec::new(b"test_secret_key_at_least_32_bytes!", Algorithm::HS256, 30).unwrap(),
        )
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let subject = Uuid::new_v4();
        let token = authenticator
            .authenticate(password, &hash, subject)
            .expect("Authentication failed");

        assert_eq!(token.token_type, "bearer");

        let claims = authenticator
            .validate_token(&token.access_token)
            .expect("Token validation failed");
        assert_eq!(claims.subject, subject);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, Uuid::new_v4());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_malformed_hash() {
        let result = authenticator().authenticate("my_password", "not-a-hash", Uuid::new_v4());
        assert!(matches!(result, Err(AuthenticationError::PasswordError(_))));
    }

    #[test]
    fn test_reject_unknown_is_invalid_credentials() {
        let result = authenticator().reject_unknown("my_password");
        assert!(matches!(result, AuthenticationError::InvalidCredentials));
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().validate_token("invalid.token.here");
        assert_eq!(result, Err(TokenError::Invalid));
    }
}
