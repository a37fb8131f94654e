//! Login credential validation.

pub mod validator;

pub use validator::{
    ACCOUNT_LOCKED_MESSAGE, CredentialValidator, INVALID_CREDENTIALS_MESSAGE, LoginOutcome,
    RejectReason,
};
