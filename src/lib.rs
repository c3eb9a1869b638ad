//! Terminal chat client for the Lu loan sales assistant.
//!
//! A chat view creates one backend session, opens the session's realtime
//! channel, and keeps an append-only transcript of user and assistant
//! messages. See `chat::run_chat` for the event loop.

pub mod about;
pub mod channel;
pub mod chat;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
mod test_support;

pub use chat::{ChatExit, ChatOutcome, InputEvent, run_chat};
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{Session, SessionClient, SessionId};
