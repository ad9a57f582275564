//! Token cache and authentication gate.

pub mod cache;
pub mod gate;

pub use cache::TokenCache;
pub use gate::AuthGate;
