//! # nicelab-database
//!
//! PostgreSQL connection management, the store traits consumed by the
//! authentication and reservation layers, their PostgreSQL repositories,
//! and an in-memory backend with identical semantics.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryBackend;
pub use store::{LabStore, SessionStore, StoreSet, TokenStore, UserStore};
