//! LM Studio OpenAI-compatible API: wire types and the request forwarder.

pub mod client;
pub mod models;

pub use client::{LmStudioClient, Method, DEFAULT_MODEL};
