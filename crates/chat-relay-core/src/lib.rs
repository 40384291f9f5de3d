//! chat-relay-core
//!
//! Pure domain types for the chat relay: conversation turns and history,
//! the inbound request and success reply bodies, caller identity, and
//! prompt composition. No network or AWS dependency.

pub mod error;
pub mod models;
pub mod prompt;
