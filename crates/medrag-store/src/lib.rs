//! Store backends and retrieval tools for medrag
//!
//! This crate provides the MongoDB-backed and in-memory document stores, the
//! fastembed query embedder, and the `ToolKit` wrapping the four retrieval
//! operations.

mod config;
mod embedder;
mod memory;
mod mongo;
mod toolkit;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_CANDIDATE_POOL, MongoConfig};
pub use embedder::{DEFAULT_EMBED_MODEL, FastEmbedder};
pub use memory::{MemoryStore, SAMPLE_SUMMARIES};
pub use mongo::MongoStore;
pub use toolkit::ToolKit;

// Re-export core types for convenience
pub use medrag_core::{
    DocumentStore, Embedder, Error, Result, StayComparison, SummaryHit, ToolCall, ToolOutput,
};
