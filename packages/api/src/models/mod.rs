//! Data models for the application.

mod user;
mod wire;

#[cfg(feature = "server")]
pub use user::{Account, NewAccount};
pub use user::UserInfo;
pub use wire::{
    AuthResponse, ErrorBody, GoogleSignInRequest, LoginRequest, MeResponse, RegisterRequest,
};
