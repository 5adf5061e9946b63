//! Document store and embedder traits

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

/// One vector-search match from the summaries collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryHit {
    pub summary: String,
    pub score: f64,
}

/// Trait for turning text into a fixed-length embedding vector
pub trait Embedder: Send + Sync {
    /// Embed a single piece of text
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Dimensionality of the produced vectors
    fn dimensions(&self) -> usize;
}

/// Trait for the hospital document store
///
/// Two read-only collections sit behind this trait: free-text summaries with
/// precomputed embeddings, and structured patient records. Missing data is
/// signalled by `Ok(None)` or an empty vec, never by an error.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Nearest-neighbor search over the summaries collection
    async fn search_summaries(
        &self,
        query_vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<SummaryHit>>;

    /// Mean stay length over records whose medical condition matches exactly
    async fn average_stay(&self, condition: &str) -> Result<Option<f64>>;

    /// Count of patient records matching a filter mapping
    ///
    /// The filter maps field names to exact values or comparison objects
    /// (`$gt`/`$lt`/`$gte`/`$lte`).
    async fn count_patients(&self, filter: &Value) -> Result<u64>;
}
