//! CLI interface for medrag
//!
//! The router asks the model which tool answers a question, the executor
//! recovers and normalizes the model's decision, and the explainer phrases
//! the tool's raw result as a natural-language answer.

pub mod executor;
mod explainer;
mod router;
mod ui;

#[cfg(test)]
mod tests;

pub use executor::{RouterDecision, interpret, lenient_json};
pub use explainer::{AnswerExplainer, render_result};
pub use router::{QueryRouter, ROUTING_PROMPT};
pub use ui::{display_banner, read_question};

// Re-export core types
pub use medrag_core::{Error, Result};
