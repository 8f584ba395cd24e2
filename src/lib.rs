//! Security gate for the flight API.
//!
//! Every request goes through the same chain:
//!
//! ```text
//! CORS → HTTP layers → security headers → credential verification → route enforcement → handler
//! ```
//!
//! The route table, the access-token verifier and the password hasher are
//! plain values built once in [`app::build_state`] and shared through
//! [`state::AppState`].

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
