//! fastembed-backed embedder

use std::str::FromStr;
use std::sync::Mutex;

use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};

use medrag_core::{Embedder, Error, Result};

/// Default sentence-transformer model for query embeddings
pub const DEFAULT_EMBED_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Embedder backed by fastembed's `TextEmbedding`
///
/// The loaded model is kept behind a `Mutex` so one instance can be shared
/// without cloning heavyweight resources.
pub struct FastEmbedder {
    dimensions: usize,
    inner: Mutex<TextEmbedding>,
}

impl FastEmbedder {
    /// Load the model with the given name (for example
    /// `sentence-transformers/all-MiniLM-L6-v2`)
    pub fn new(model_name: &str) -> Result<Self> {
        let label = model_name.trim();
        if label.is_empty() {
            return Err(Error::InvalidInput(
                "embedding model name cannot be empty".to_string(),
            ));
        }

        let model = EmbeddingModel::from_str(label).map_err(|e| {
            Error::Embedding(format!("unknown embedding model `{}`: {}", label, e))
        })?;

        let model_info = TextEmbedding::get_model_info(&model).map_err(|e| {
            Error::Embedding(format!("no metadata for embedding model `{}`: {}", label, e))
        })?;
        let dimensions = model_info.dim;

        let text_embedding = TextEmbedding::try_new(TextInitOptions::new(model)).map_err(|e| {
            Error::Embedding(format!("failed to load embedding model `{}`: {}", label, e))
        })?;

        tracing::debug!(model = label, dimensions, "embedding model loaded");

        Ok(Self {
            dimensions,
            inner: Mutex::new(text_embedding),
        })
    }

    /// Load the model named by `MEDRAG_EMBED_MODEL`, or the default
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let model_name = std::env::var("MEDRAG_EMBED_MODEL")
            .unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string());
        Self::new(&model_name)
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("cannot embed empty text".to_string()));
        }

        let mut embedder = self
            .inner
            .lock()
            .map_err(|e| Error::Embedding(format!("Lock error: {}", e)))?;

        let embeddings = embedder
            .embed(vec![text], None)
            .map_err(|e| Error::Embedding(format!("inference failed: {}", e)))?;

        let vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embedding".to_string()))?;

        if vector.len() != self.dimensions {
            return Err(Error::Embedding(format!(
                "unexpected embedding dimension (expected {}, got {})",
                self.dimensions,
                vector.len()
            )));
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
