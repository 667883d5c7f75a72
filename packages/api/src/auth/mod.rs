//! Credential primitives: password hashing and session tokens.

#[cfg(feature = "server")]
mod password;
#[cfg(feature = "server")]
mod token;

#[cfg(feature = "server")]
pub use password::{hash_password, verify_password};
#[cfg(feature = "server")]
pub use token::{Claims, TokenError, TokenSigner};
