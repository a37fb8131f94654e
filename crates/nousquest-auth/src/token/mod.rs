//! Token pair issuance.

pub mod issuer;

pub use issuer::{IssuedToken, TokenIssuer, TokenPair};
