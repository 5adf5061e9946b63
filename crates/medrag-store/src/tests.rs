//! Tests for the in-memory store and the tool set

use std::sync::Arc;

use serde_json::json;

use crate::{MemoryStore, ToolKit};
use medrag_core::{DocumentStore, Embedder, Error, Result, ToolCall, ToolOutput};

/// Embedder returning a fixed vector, for exercising the retrieval path
struct FixedEmbedder(Vec<f32>);

impl Embedder for FixedEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(Error::InvalidInput("cannot embed empty text".to_string()));
        }
        Ok(self.0.clone())
    }

    fn dimensions(&self) -> usize {
        self.0.len()
    }
}

fn toolkit_over_samples() -> ToolKit {
    let store = Arc::new(MemoryStore::with_sample_patients());
    ToolKit::new(Arc::new(FixedEmbedder(vec![1.0, 0.0, 0.0])), store)
}

#[tokio::test]
async fn average_stay_over_matching_records() {
    let store = MemoryStore::with_sample_patients();
    let avg = store.average_stay("Diabetes").await.unwrap();
    assert_eq!(avg, Some(8.0));
}

#[tokio::test]
async fn average_stay_absent_for_unknown_condition() {
    let store = MemoryStore::with_sample_patients();
    let avg = store.average_stay("Migraine").await.unwrap();
    assert_eq!(avg, None);
}

#[tokio::test]
async fn count_honors_exact_match_and_greater_than() {
    let store = MemoryStore::with_sample_patients();
    let filter = json!({ "Medical Condition": "Diabetes", "stay_length": { "$gt": 5 } });
    assert_eq!(store.count_patients(&filter).await.unwrap(), 2);
}

#[tokio::test]
async fn count_honors_remaining_comparison_operators() {
    let store = MemoryStore::with_sample_patients();

    let lte = json!({ "stay_length": { "$lte": 3 } });
    assert_eq!(store.count_patients(&lte).await.unwrap(), 2);

    let gte = json!({ "stay_length": { "$gte": 9 } });
    assert_eq!(store.count_patients(&gte).await.unwrap(), 2);

    let lt = json!({ "stay_length": { "$lt": 2 } });
    assert_eq!(store.count_patients(&lt).await.unwrap(), 0);
}

#[tokio::test]
async fn count_with_unknown_operator_matches_nothing() {
    let store = MemoryStore::with_sample_patients();
    let filter = json!({ "stay_length": { "$near": 5 } });
    assert_eq!(store.count_patients(&filter).await.unwrap(), 0);
}

#[tokio::test]
async fn search_ranks_by_cosine_similarity() {
    let store = MemoryStore::new();
    store
        .insert_summary("aligned", vec![1.0, 0.0, 0.0])
        .unwrap();
    store
        .insert_summary("diagonal", vec![1.0, 1.0, 0.0])
        .unwrap();
    store
        .insert_summary("orthogonal", vec![0.0, 1.0, 0.0])
        .unwrap();

    let hits = store
        .search_summaries(vec![1.0, 0.0, 0.0], 2)
        .await
        .unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].summary, "aligned");
    assert_eq!(hits[1].summary, "diagonal");
    assert!(hits[0].score > hits[1].score);
}

#[tokio::test]
async fn semantic_retrieve_caps_results_and_carries_scores() {
    let store = Arc::new(MemoryStore::new());
    for i in 0..8 {
        store
            .insert_summary(format!("summary {}", i), vec![1.0, i as f32 * 0.1, 0.0])
            .unwrap();
    }
    let toolkit = ToolKit::new(Arc::new(FixedEmbedder(vec![1.0, 0.0, 0.0])), store);

    let output = toolkit
        .dispatch(&ToolCall::SemanticRetrieve {
            query: "chest pain".to_string(),
            top_k: 5,
        })
        .await
        .unwrap();

    let Some(ToolOutput::Summaries(hits)) = output else {
        panic!("expected a summary list");
    };
    assert_eq!(hits.len(), 5);
    assert!(hits.iter().all(|hit| hit.score > 0.0));
}

#[tokio::test]
async fn compare_stay_reports_both_averages_and_difference() {
    let toolkit = toolkit_over_samples();
    let comparison = toolkit
        .compare_stay("Diabetes", "Hypertension")
        .await
        .unwrap()
        .expect("both conditions have records");

    assert_eq!(comparison.avg1, 8.0);
    assert_eq!(comparison.avg2, 5.0);
    assert_eq!(comparison.difference, 3.0);
}

#[tokio::test]
async fn compare_stay_absent_when_either_condition_unmatched() {
    let toolkit = toolkit_over_samples();
    let comparison = toolkit
        .compare_stay("Diabetes", "Migraine")
        .await
        .unwrap();
    assert!(comparison.is_none());
}

#[tokio::test]
async fn dispatch_avg_stay_absent_for_unknown_condition() {
    let toolkit = toolkit_over_samples();
    let output = toolkit
        .dispatch(&ToolCall::AvgStay {
            condition: "Migraine".to_string(),
        })
        .await
        .unwrap();
    assert!(output.is_none());
}

#[tokio::test]
async fn dispatch_count_returns_count_output() {
    let toolkit = toolkit_over_samples();
    let output = toolkit
        .dispatch(&ToolCall::CountPatients {
            filter: json!({ "Medical Condition": "Asthma" }),
        })
        .await
        .unwrap();
    assert_eq!(output, Some(ToolOutput::Count(2)));
}
