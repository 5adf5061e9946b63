//! Core traits and types for medrag
//!
//! This crate defines the fundamental traits and types used across the
//! medrag system. It provides capability-facing interfaces for chat LLM
//! providers, embedders, and the hospital document store, making the system
//! test-friendly and extensible.

pub mod error;
pub mod llm;
pub mod store;
pub mod tool;

pub use error::{Error, Result};
pub use llm::{ChatConfig, ChatLlm, ChatMessage, ChatRole};
pub use store::{DocumentStore, Embedder, SummaryHit};
pub use tool::{StayComparison, ToolCall, ToolOutput};
