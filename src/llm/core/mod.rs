//! Core abstractions shared by upstream providers

pub mod config;
pub mod error;
pub mod provider;
