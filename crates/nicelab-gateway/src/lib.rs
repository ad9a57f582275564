//! # nicelab-gateway
//!
//! Stateless edge gateway. Forwards `/v1/auth/*` to the auth service and
//! `/v1/pipeline/*` to the pipeline service with the prefix removed.

pub mod proxy;
pub mod router;

pub use proxy::Upstream;
pub use router::build_gateway_router;
