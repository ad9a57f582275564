//! # nicelab-entity
//!
//! Domain entity models for NiceLab. Every struct in this crate represents
//! a database row or a domain value object. Database entities derive
//! `sqlx::FromRow` alongside serde.

pub mod lab;
pub mod session;
pub mod token;
pub mod user;

pub use lab::{Lab, LabPlatform};
pub use session::{LabSession, LabSessionRow, SessionCredentials};
pub use token::{AuthToken, TokenOwner};
pub use user::{User, UserRole};
