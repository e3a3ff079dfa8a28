//! llama.cpp server provider
//!
//! Talks to the `/completion` endpoint of a llama.cpp-compatible server,
//! either streaming the raw response body or waiting for the full answer.

pub mod client;
pub mod types;

pub use client::LlamaClient;
