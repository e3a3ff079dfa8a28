// HTTP Server modules
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sse;

// Chat store client library
pub mod chat_db;

// Upstream inference client
pub mod llm;

// Token stream relay
pub mod relay;
