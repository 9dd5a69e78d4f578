use thiserror::Error;

/// Error type for token operations.
///
/// Every verification failure (bad signature, malformed payload, missing or
/// unparseable subject, expiry) is reported as `Invalid` so callers cannot tell
/// a forged token from an expired one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Could not validate credentials")]
    Invalid,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token lifetime out of range: {0} minutes")]
    InvalidLifetime(i64),
}
