//! In-memory document store
//!
//! Used by the test suite and as a seeded fallback when no MongoDB
//! connection is configured. Summaries are scored by cosine similarity
//! against their stored embeddings; patient filters are evaluated
//! field-by-field with exact match and the four comparison operators.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::RwLock;

use medrag_core::{DocumentStore, Error, Result, SummaryHit};

/// Sample summaries used to seed a fallback store
pub const SAMPLE_SUMMARIES: &[&str] = &[
    "Patient admitted with acute chest pain and shortness of breath; cardiac enzymes were monitored over a three day stay.",
    "Long-term diabetic patient presented with poorly controlled blood sugar and was discharged after insulin adjustment.",
    "Elderly patient with hypertension reported recurring headaches and dizziness; medication was rebalanced during the stay.",
    "Asthma exacerbation triggered by seasonal allergies; nebulizer treatment resolved the wheezing within two days.",
    "Post-operative recovery after knee arthroplasty for severe arthritis; physical therapy started on day two.",
];

struct StoredSummary {
    summary: String,
    embedding: Vec<f32>,
}

/// Local in-memory document store
pub struct MemoryStore {
    summaries: RwLock<Vec<StoredSummary>>,
    patients: RwLock<Vec<Value>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            summaries: RwLock::new(Vec::new()),
            patients: RwLock::new(Vec::new()),
        }
    }

    /// Create a store seeded with a small set of patient records
    pub fn with_sample_patients() -> Self {
        let records = vec![
            json!({ "Medical Condition": "Diabetes", "stay_length": 7 }),
            json!({ "Medical Condition": "Diabetes", "stay_length": 5 }),
            json!({ "Medical Condition": "Diabetes", "stay_length": 12 }),
            json!({ "Medical Condition": "Hypertension", "stay_length": 4 }),
            json!({ "Medical Condition": "Hypertension", "stay_length": 6 }),
            json!({ "Medical Condition": "Asthma", "stay_length": 2 }),
            json!({ "Medical Condition": "Asthma", "stay_length": 3 }),
            json!({ "Medical Condition": "Arthritis", "stay_length": 9 }),
        ];
        Self {
            summaries: RwLock::new(Vec::new()),
            patients: RwLock::new(records),
        }
    }

    /// Add a summary with its embedding vector
    pub fn insert_summary(&self, summary: impl Into<String>, embedding: Vec<f32>) -> Result<()> {
        let mut summaries = self
            .summaries
            .write()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;
        summaries.push(StoredSummary {
            summary: summary.into(),
            embedding,
        });
        Ok(())
    }

    /// Add a patient record document
    pub fn insert_patient(&self, record: Value) -> Result<()> {
        let mut patients = self
            .patients
            .write()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;
        patients.push(record);
        Ok(())
    }

    /// Cosine similarity between two vectors
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    /// Whether a record satisfies one filter condition
    ///
    /// A condition is either an exact value or a mapping of comparison
    /// operators to numeric operands.
    fn value_matches(actual: Option<&Value>, condition: &Value) -> bool {
        let Some(actual) = actual else {
            return false;
        };

        match condition.as_object() {
            Some(ops) if ops.keys().any(|k| k.starts_with('$')) => {
                let Some(actual_num) = actual.as_f64() else {
                    return false;
                };
                ops.iter().all(|(op, operand)| {
                    let Some(operand) = operand.as_f64() else {
                        return false;
                    };
                    match op.as_str() {
                        "$gt" => actual_num > operand,
                        "$gte" => actual_num >= operand,
                        "$lt" => actual_num < operand,
                        "$lte" => actual_num <= operand,
                        _ => false,
                    }
                })
            }
            _ => match (actual.as_f64(), condition.as_f64()) {
                // Numeric equality ignores integer/float representation
                (Some(a), Some(c)) => a == c,
                _ => actual == condition,
            },
        }
    }

    /// Whether a record satisfies every condition in a filter mapping
    fn matches_filter(record: &Value, filter: &Value) -> bool {
        let Some(conditions) = filter.as_object() else {
            return false;
        };
        conditions
            .iter()
            .all(|(field, condition)| Self::value_matches(record.get(field), condition))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn search_summaries(
        &self,
        query_vector: Vec<f32>,
        top_k: usize,
    ) -> Result<Vec<SummaryHit>> {
        let summaries = self
            .summaries
            .read()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;

        let mut hits: Vec<SummaryHit> = summaries
            .iter()
            .map(|stored| SummaryHit {
                summary: stored.summary.clone(),
                score: Self::cosine_similarity(&query_vector, &stored.embedding) as f64,
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn average_stay(&self, condition: &str) -> Result<Option<f64>> {
        let patients = self
            .patients
            .read()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;

        let stays: Vec<f64> = patients
            .iter()
            .filter(|record| {
                record.get("Medical Condition").and_then(Value::as_str) == Some(condition)
            })
            .filter_map(|record| record.get("stay_length").and_then(Value::as_f64))
            .collect();

        if stays.is_empty() {
            return Ok(None);
        }
        Ok(Some(stays.iter().sum::<f64>() / stays.len() as f64))
    }

    async fn count_patients(&self, filter: &Value) -> Result<u64> {
        let patients = self
            .patients
            .read()
            .map_err(|e| Error::Store(format!("Lock error: {}", e)))?;

        Ok(patients
            .iter()
            .filter(|record| Self::matches_filter(record, filter))
            .count() as u64)
    }
}
