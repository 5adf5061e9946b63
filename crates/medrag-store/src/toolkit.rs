//! The four retrieval tools

use std::sync::Arc;

use serde_json::Value;

use medrag_core::{
    DocumentStore, Embedder, Result, StayComparison, SummaryHit, ToolCall, ToolOutput,
};

/// The tool set: four thin wrappers over store queries
///
/// Handles are injected rather than held as globals so tests can substitute
/// fakes for the embedder and the store.
pub struct ToolKit {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn DocumentStore>,
}

impl ToolKit {
    /// Create a tool set over the given embedder and store
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn DocumentStore>) -> Self {
        Self { embedder, store }
    }

    /// Embed the query text and run a nearest-neighbor search over summaries
    pub async fn semantic_retrieve(&self, query: &str, top_k: usize) -> Result<Vec<SummaryHit>> {
        let query_vector = self.embedder.embed(query)?;
        self.store.search_summaries(query_vector, top_k).await
    }

    /// Mean stay length for one condition; absent when no records match
    pub async fn avg_stay(&self, condition: &str) -> Result<Option<f64>> {
        self.store.average_stay(condition).await
    }

    /// Count of patient records matching a filter mapping
    pub async fn count_patients(&self, filter: &Value) -> Result<u64> {
        self.store.count_patients(filter).await
    }

    /// Average stay for two conditions plus their difference
    ///
    /// Absent when either average is unavailable; never a partial result.
    pub async fn compare_stay(
        &self,
        first: &str,
        second: &str,
    ) -> Result<Option<StayComparison>> {
        let avg1 = self.store.average_stay(first).await?;
        let avg2 = self.store.average_stay(second).await?;

        match (avg1, avg2) {
            (Some(avg1), Some(avg2)) => Ok(Some(StayComparison {
                cond1: first.to_string(),
                avg1,
                cond2: second.to_string(),
                avg2,
                difference: avg1 - avg2,
            })),
            _ => Ok(None),
        }
    }

    /// Invoke the tool named by a canonical call
    pub async fn dispatch(&self, call: &ToolCall) -> Result<Option<ToolOutput>> {
        tracing::debug!(tool = call.name(), "dispatching tool call");

        match call {
            ToolCall::SemanticRetrieve { query, top_k } => {
                let hits = self.semantic_retrieve(query, *top_k).await?;
                Ok(Some(ToolOutput::Summaries(hits)))
            }
            ToolCall::AvgStay { condition } => {
                Ok(self.avg_stay(condition).await?.map(ToolOutput::Average))
            }
            ToolCall::CountPatients { filter } => {
                let count = self.count_patients(filter).await?;
                Ok(Some(ToolOutput::Count(count)))
            }
            ToolCall::CompareStay { first, second } => Ok(self
                .compare_stay(first, second)
                .await?
                .map(ToolOutput::Comparison)),
        }
    }
}
