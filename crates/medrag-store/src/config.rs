//! Store configuration

use medrag_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default candidate pool size for vector search
pub const DEFAULT_CANDIDATE_POOL: usize = 200;

/// Configuration for the MongoDB-backed document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    /// Candidate pool size handed to the vector-search stage
    pub candidate_pool: usize,
}

impl MongoConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let uri = env::var("MONGODB_URI").map_err(|_| {
            Error::Configuration("MONGODB_URI environment variable not found".to_string())
        })?;

        let database = env::var("MEDRAG_DB").unwrap_or_else(|_| "health_rag".to_string());

        Ok(Self {
            uri,
            database,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
        })
    }

    /// Create configuration with explicit values
    pub fn new(uri: String, database: String) -> Self {
        Self {
            uri,
            database,
            candidate_pool: DEFAULT_CANDIDATE_POOL,
        }
    }

    /// Override the vector-search candidate pool size
    pub fn with_candidate_pool(mut self, candidate_pool: usize) -> Self {
        self.candidate_pool = candidate_pool;
        self
    }
}
