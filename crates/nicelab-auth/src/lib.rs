//! # nicelab-auth
//!
//! Opaque session-token authentication for NiceLab.
//!
//! ## Modules
//!
//! - `password`: Argon2id password hashing and verification
//! - `token`: the in-process token cache and the authentication gate in front of it
//! - `login`: email/password login that reissues the caller's token

pub mod login;
pub mod password;
pub mod token;

pub use login::{LoginResult, LoginService};
pub use password::PasswordHasher;
pub use token::{AuthGate, TokenCache};
