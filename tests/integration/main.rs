//! End-to-end tests driving the HTTP router against the in-memory backend.

mod helpers;

mod auth_test;
mod lab_test;
mod session_test;
