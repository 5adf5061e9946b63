//! Tests for the router/executor/explainer contract

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::executor::{self, RouterDecision};
use crate::{AnswerExplainer, QueryRouter, ROUTING_PROMPT, interpret, lenient_json, render_result};
use medrag_core::{
    ChatConfig, ChatLlm, ChatMessage, ChatRole, Result, StayComparison, ToolCall, ToolOutput,
};

/// Chat LLM double that records every call and returns a canned reply
struct MockLlm {
    reply: String,
    calls: Mutex<Vec<(Vec<ChatMessage>, ChatConfig)>>,
}

impl MockLlm {
    fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn last_call(&self) -> (Vec<ChatMessage>, ChatConfig) {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no chat call recorded")
    }
}

#[async_trait]
impl ChatLlm for MockLlm {
    async fn chat(&self, messages: &[ChatMessage], config: &ChatConfig) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((messages.to_vec(), config.clone()));
        Ok(self.reply.clone())
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

// --- lenient parsing ---

#[test]
fn fenced_json_parses_like_unwrapped_json() {
    let bare = r#"{"function": "get_avg_stay", "args": {"condition": "Asthma"}}"#;
    let fenced = format!("```json\n{}\n```", bare);

    assert_eq!(lenient_json(&fenced), lenient_json(bare));
    assert!(lenient_json(bare).is_some());
}

#[test]
fn json_embedded_in_prose_is_recovered() {
    let text = r#"Sure! Here is the routing decision:
{"function": "count_patients", "args": {"filter_obj": {"Medical Condition": "Asthma"}}}
Let me know if you need anything else."#;

    let value = lenient_json(text).expect("object should be recovered");
    assert_eq!(value["function"], "count_patients");
}

#[test]
fn garbage_text_yields_no_value() {
    assert_eq!(lenient_json(""), None);
    assert_eq!(lenient_json("I could not decide on a tool."), None);
    assert_eq!(lenient_json("{not json at all"), None);
}

// --- decision extraction ---

#[test]
fn decision_accepts_key_aliases() {
    let primary = json!({ "function": "get_avg_stay", "args": { "condition": "Asthma" } });
    let aliased = json!({ "function_name": "get_avg_stay", "parameters": { "condition": "Asthma" } });

    let a = executor::extract_decision(&primary).unwrap();
    let b = executor::extract_decision(&aliased).unwrap();
    assert_eq!(a, b);
}

#[test]
fn decision_without_name_is_unroutable() {
    let value = json!({ "args": { "condition": "Asthma" } });
    assert_eq!(executor::extract_decision(&value), None);
}

#[test]
fn decision_defaults_to_empty_args() {
    let value = json!({ "function": "semantic_retrieve" });
    let decision = executor::extract_decision(&value).unwrap();
    assert_eq!(decision.args, json!({}));
}

// --- normalization ---

#[test]
fn flat_count_args_normalize_into_filter() {
    let decision = RouterDecision {
        name: "count_patients".to_string(),
        args: json!({ "condition": "diabetes", "min_stay_days": 5 }),
    };

    let call = executor::normalize(decision).unwrap();
    assert_eq!(
        call,
        ToolCall::CountPatients {
            filter: json!({ "Medical Condition": "Diabetes", "stay_length": { "$gt": 5 } }),
        }
    );
}

#[test]
fn fractional_stay_threshold_truncates_to_integer() {
    let decision = RouterDecision {
        name: "count_patients".to_string(),
        args: json!({ "min_stay_days": 5.9 }),
    };

    let call = executor::normalize(decision).unwrap();
    assert_eq!(
        call,
        ToolCall::CountPatients {
            filter: json!({ "stay_length": { "$gt": 5 } }),
        }
    );
}

#[test]
fn ready_made_filter_gets_condition_capitalized() {
    let decision = RouterDecision {
        name: "count_patients".to_string(),
        args: json!({ "filter_obj": { "Medical Condition": "dIaBeTes", "stay_length": { "$lt": 4 } } }),
    };

    let call = executor::normalize(decision).unwrap();
    assert_eq!(
        call,
        ToolCall::CountPatients {
            filter: json!({ "Medical Condition": "Diabetes", "stay_length": { "$lt": 4 } }),
        }
    );
}

#[test]
fn semantic_retrieve_defaults_to_five_results() {
    let decision = RouterDecision {
        name: "semantic_retrieve".to_string(),
        args: json!({ "query": "chest pain" }),
    };

    let call = executor::normalize(decision).unwrap();
    assert_eq!(
        call,
        ToolCall::SemanticRetrieve {
            query: "chest pain".to_string(),
            top_k: 5,
        }
    );
}

#[test]
fn missing_required_arguments_yield_no_call() {
    let no_query = RouterDecision {
        name: "semantic_retrieve".to_string(),
        args: json!({}),
    };
    assert_eq!(executor::normalize(no_query), None);

    let one_condition = RouterDecision {
        name: "compare_stay".to_string(),
        args: json!({ "cond1": "Diabetes" }),
    };
    assert_eq!(executor::normalize(one_condition), None);
}

#[test]
fn unknown_tool_name_yields_no_call() {
    let decision = RouterDecision {
        name: "drop_all_records".to_string(),
        args: json!({}),
    };
    assert_eq!(executor::normalize(decision), None);
}

#[test]
fn interpret_runs_the_whole_pipeline() {
    let raw = r#"```json
{"function_name": "compare_stay", "parameters": {"cond1": "Diabetes", "cond2": "Asthma"}}
```"#;

    let call = interpret(raw).unwrap();
    assert_eq!(
        call,
        ToolCall::CompareStay {
            first: "Diabetes".to_string(),
            second: "Asthma".to_string(),
        }
    );
}

// --- router ---

#[test]
fn routing_prompt_names_all_four_tools() {
    for tool in [
        "semantic_retrieve",
        "get_avg_stay",
        "count_patients",
        "compare_stay",
    ] {
        assert!(ROUTING_PROMPT.contains(tool), "prompt must name {}", tool);
    }
}

#[tokio::test]
async fn router_sends_deterministic_request() {
    let llm = Arc::new(MockLlm::replying(
        r#"{"function": "get_avg_stay", "args": {"condition": "Asthma"}}"#,
    ));
    let router = QueryRouter::new(llm.clone());

    let raw = router.route("average stay for asthma?").await.unwrap();
    assert!(raw.contains("get_avg_stay"));

    let (messages, config) = llm.last_call();
    assert_eq!(config.temperature, 0.0);
    assert_eq!(messages[0].role, ChatRole::System);
    assert_eq!(messages[1].role, ChatRole::User);
    assert_eq!(messages[1].content, "average stay for asthma?");
}

#[tokio::test]
async fn routed_decision_interprets_into_a_tool_call() {
    let llm = Arc::new(MockLlm::replying(
        r#"{"function": "count_patients", "args": {"condition": "diabetes", "min_stay_days": 5}}"#,
    ));
    let router = QueryRouter::new(llm);

    let raw = router
        .route("how many diabetes patients stayed over 5 days?")
        .await
        .unwrap();
    let call = interpret(&raw).unwrap();

    assert_eq!(
        call,
        ToolCall::CountPatients {
            filter: json!({ "Medical Condition": "Diabetes", "stay_length": { "$gt": 5 } }),
        }
    );
}

// --- explainer ---

#[test]
fn absent_result_renders_as_null() {
    assert_eq!(render_result(None).unwrap(), "null");
}

#[test]
fn comparison_result_keeps_its_field_names() {
    let output = ToolOutput::Comparison(StayComparison {
        cond1: "Diabetes".to_string(),
        avg1: 8.0,
        cond2: "Asthma".to_string(),
        avg2: 2.5,
        difference: 5.5,
    });

    let rendered = render_result(Some(&output)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(value["cond1"], "Diabetes");
    assert_eq!(value["avg1"], 8.0);
    assert_eq!(value["difference"], 5.5);
}

#[tokio::test]
async fn explainer_sends_result_with_creative_temperature() {
    let llm = Arc::new(MockLlm::replying("Diabetes patients stay 8 days on average."));
    let explainer = AnswerExplainer::new(llm.clone());

    let answer = explainer
        .explain("average stay for diabetes?", Some(&ToolOutput::Average(8.0)))
        .await
        .unwrap();
    assert!(!answer.is_empty());

    let (messages, config) = llm.last_call();
    assert_eq!(config.temperature, 1.0);
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].role, ChatRole::System);
    assert_eq!(messages[2].content, "tool_result: 8.0");
}
