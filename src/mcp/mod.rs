//! Model Context Protocol server layer.

pub mod handler;
pub mod registry;
pub mod tools;
pub mod transport;
