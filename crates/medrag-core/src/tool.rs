//! Canonical tool request and result types
//!
//! The executor normalizes every accepted argument shape from the router
//! into a `ToolCall` before dispatch, so the tools themselves only ever see
//! one canonical form.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SummaryHit;

/// A fully normalized request for one of the four retrieval tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolCall {
    /// Vector search over the summaries collection
    SemanticRetrieve { query: String, top_k: usize },
    /// Mean stay length for one medical condition
    AvgStay { condition: String },
    /// Count of patient records matching a filter mapping
    CountPatients { filter: Value },
    /// Average stay of two conditions plus their difference
    CompareStay { first: String, second: String },
}

impl ToolCall {
    /// Wire name of the tool, as exposed to the router model
    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::SemanticRetrieve { .. } => "semantic_retrieve",
            ToolCall::AvgStay { .. } => "get_avg_stay",
            ToolCall::CountPatients { .. } => "count_patients",
            ToolCall::CompareStay { .. } => "compare_stay",
        }
    }
}

/// Result of comparing the average stay of two conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StayComparison {
    pub cond1: String,
    pub avg1: f64,
    pub cond2: String,
    pub avg2: f64,
    pub difference: f64,
}

/// Raw result of a tool invocation, serialized verbatim for the explainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Summaries(Vec<SummaryHit>),
    Average(f64),
    Count(u64),
    Comparison(StayComparison),
}
