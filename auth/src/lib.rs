//! Authentication utilities library
//!
//! Provides the credential and token primitives of the identity service:
//! - Password hashing (Argon2id, tunable work factor)
//! - Signed, expiring bearer tokens (HMAC JWT)
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Tokens
//! ```
//! use auth::TokenCodec;
//! use uuid::Uuid;
//!
//! let codec = TokenCodec::from_algorithm_name(b"secret_key_at_least_32_bytes_long!", "HS256", 30).unwrap();
//! let subject = Uuid::new_v4();
//! let token = codec.issue(subject).unwrap();
//! assert_eq!(token.token_type, "bearer");
//!
//! let claims = codec.verify(&token.access_token).unwrap();
//! assert_eq!(claims.subject, subject);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, PasswordHasher, TokenCodec};
//! use uuid::Uuid;
//!
//! let codec = TokenCodec::from_algorithm_name(b"secret_key_at_least_32_bytes_long!", "HS256", 30).unwrap();
//! let auth = Authenticator::new(PasswordHasher::new(), codec);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let user_id = Uuid::new_v4();
//! let token = auth.authenticate("password123", &hash, user_id).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&token.access_token).unwrap();
//! assert_eq!(claims.subject, user_id);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use jwt::Token;
pub use jwt::TokenClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
