//! chat-relay-inference
//!
//! Client for the remote text-generation endpoint: request/response shapes,
//! the single POST, and extraction of the generated text.

pub mod client;
pub mod error;
pub mod generation;
