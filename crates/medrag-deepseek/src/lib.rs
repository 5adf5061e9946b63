//! DeepSeek integration for medrag
//!
//! This crate provides the DeepSeek implementation of the ChatLlm trait.

mod client;
mod config;

pub use client::DeepSeekClient;
pub use config::DeepSeekConfig;

// Re-export core types for convenience
pub use medrag_core::{ChatConfig, ChatLlm, ChatMessage, ChatRole, Error, Result};
