//! # nicelab-service
//!
//! Application use cases. Services take their stores and the provisioner
//! at construction time and receive the acting identity as an explicit
//! [`RequestContext`].

pub mod context;
pub mod reservation;
pub mod user;

pub use context::RequestContext;
pub use reservation::{Reservation, ReservationService};
pub use user::UserService;
