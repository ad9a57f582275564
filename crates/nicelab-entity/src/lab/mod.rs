//! Lab machine entities.

pub mod model;
pub mod platform;

pub use model::Lab;
pub use platform::LabPlatform;
