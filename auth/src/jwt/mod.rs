pub mod claims;
pub mod codec;
pub mod errors;

pub use claims::Token;
pub use claims::TokenClaims;
pub use codec::parse_algorithm;
pub use codec::TokenCodec;
pub use errors::TokenError;
