//! Gig Node desktop client internals.
//!
//! The binary in `main.rs` wires these together; they are exposed as a
//! library so integration tests can drive the API client directly.

pub mod api;
pub mod app;
pub mod state;
pub mod ui;
pub mod wallet_bridge;
