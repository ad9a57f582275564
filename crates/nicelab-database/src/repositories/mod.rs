//! PostgreSQL implementations of the store traits.

pub mod lab;
pub mod session;
pub mod token;
pub mod user;

pub use lab::LabRepository;
pub use session::SessionRepository;
pub use token::TokenRepository;
pub use user::UserRepository;
