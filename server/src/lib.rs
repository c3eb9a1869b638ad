//! `lu-server` — in-memory development backend for the Lu chat client.
//!
//! Serves the session REST endpoints and the per-session WebSocket that the
//! client consumes. Replies come from a pluggable [`responder::Responder`];
//! nothing is persisted across restarts.

pub mod config;
pub mod error;
pub mod responder;
pub mod routes;
pub mod services;
pub mod state;
