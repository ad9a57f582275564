//! # nicelab-provision
//!
//! Drives a lab machine through account creation for a user: renders the
//! platform's command batch, submits it to the remote-execution backend,
//! and polls for completion under a wall-clock deadline.
//!
//! ## Modules
//!
//! - `username`: email → account name slugging
//! - `batch`: platform → command template table
//! - `executor`: the remote-execution backend seam and its implementations
//! - `driver`: the dispatch / poll / deadline state machine

pub mod batch;
pub mod driver;
pub mod error;
pub mod executor;
pub mod username;

pub use batch::{BatchParams, build_command_batch};
pub use driver::{ProvisioningOutcome, Provisioner};
pub use error::ProvisionError;
pub use executor::{CommandExecutor, CommandHandle, CommandRequest, InvocationStatus};
pub use username::username_from_email;
