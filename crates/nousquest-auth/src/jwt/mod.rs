//! JWT claims, signing, verification, and revocation.

pub mod claims;
pub mod decoder;
pub mod deny_list;
pub mod encoder;

pub use claims::{Claims, TokenType};
pub use decoder::JwtDecoder;
pub use deny_list::TokenDenyList;
pub use encoder::JwtEncoder;
