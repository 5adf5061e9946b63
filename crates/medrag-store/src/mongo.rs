//! MongoDB-backed document store

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Client, Collection};
use serde_json::Value;

use medrag_core::{DocumentStore, Error, Result, SummaryHit};

use crate::config::MongoConfig;

/// Collection holding free-text summaries with precomputed embeddings
const SUMMARIES_COLLECTION: &str = "summaries";
/// Collection holding structured patient records
const PATIENTS_COLLECTION: &str = "patients";
/// Atlas search index over the summary embeddings
const VECTOR_INDEX: &str = "vector_index";
/// Field of the summary documents carrying the embedding vector
const EMBEDDING_PATH: &str = "embedding";

/// Document store backed by two MongoDB collections
pub struct MongoStore {
    summaries: Collection<Document>,
    patients: Collection<Document>,
    candidate_pool: usize,
}

impl MongoStore {
    /// Connect to MongoDB and verify the connection with a ping
    pub async fn connect(config: &MongoConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| Error::Store(format!("Failed to connect: {}", e)))?;

        let db = client.database(&config.database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| Error::Store(format!("Ping failed: {}", e)))?;

        tracing::debug!(database = %config.database, "connected to MongoDB");

        Ok(Self {
            summaries: db.collection(SUMMARIES_COLLECTION),
            patients: db.collection(PATIENTS_COLLECTION),
            candidate_pool: config.candidate_pool,
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn search_summaries(
        &self,
        query_vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<SummaryHit>> {
        let query_vector =
            bson::to_bson(&query_vector).map_err(|e| Error::Serialization(e.to_string()))?;

        let pipeline = vec![
            doc! {
                "$vectorSearch": {
                    "index": VECTOR_INDEX,
                    "path": EMBEDDING_PATH,
                    "queryVector": query_vector,
                    "numCandidates": self.candidate_pool.max(top_k) as i32,
                    "limit": top_k as i32,
                }
            },
            doc! {
                "$project": {
                    "_id": 0,
                    "summary": 1,
                    "score": { "$meta": "vectorSearchScore" },
                }
            },
        ];

        let mut cursor = self
            .summaries
            .aggregate(pipeline)
            .await
            .map_err(|e| Error::Store(format!("Vector search failed: {}", e)))?;

        let mut hits = Vec::new();
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| Error::Store(format!("Cursor error: {}", e)))?
        {
            hits.push(SummaryHit {
                summary: doc.get_str("summary").unwrap_or_default().to_string(),
                score: doc.get_f64("score").unwrap_or(0.0),
            });
        }

        tracing::debug!(hits = hits.len(), "vector search completed");
        Ok(hits)
    }

    async fn average_stay(&self, condition: &str) -> Result<Option<f64>> {
        let pipeline = vec![
            doc! { "$match": { "Medical Condition": condition } },
            doc! { "$group": { "_id": null, "avg": { "$avg": "$stay_length" } } },
        ];

        let mut cursor = self
            .patients
            .aggregate(pipeline)
            .await
            .map_err(|e| Error::Store(format!("Aggregation failed: {}", e)))?;

        let first = cursor
            .try_next()
            .await
            .map_err(|e| Error::Store(format!("Cursor error: {}", e)))?;

        // No group document means no records matched; a null average means the
        // matched records carried no stay_length values.
        let avg = first.and_then(|doc| match doc.get("avg") {
            Some(Bson::Double(v)) => Some(*v),
            Some(Bson::Int32(v)) => Some(*v as f64),
            Some(Bson::Int64(v)) => Some(*v as f64),
            _ => None,
        });

        Ok(avg)
    }

    async fn count_patients(&self, filter: &Value) -> Result<u64> {
        let filter =
            bson::to_document(filter).map_err(|e| Error::Serialization(e.to_string()))?;

        self.patients
            .count_documents(filter)
            .await
            .map_err(|e| Error::Store(format!("Count failed: {}", e)))
    }
}
