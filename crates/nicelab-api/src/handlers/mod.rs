//! Route handlers organized by domain.

pub mod auth;
pub mod health;
pub mod lab;
pub mod session;
pub mod user;
