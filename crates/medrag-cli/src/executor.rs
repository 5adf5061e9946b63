//! Executor: recover a structured decision from unreliable router text and
//! normalize it into a canonical tool call
//!
//! Model output is text, not data; everything here degrades to `None`
//! instead of failing. The accepted argument shapes are wider than the
//! documented ones on purpose, so the variability stays isolated at this
//! boundary and the tools only ever see `ToolCall`.

use regex::Regex;
use serde_json::{Value, json};

use medrag_core::ToolCall;

/// A tool selection recovered from router output, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RouterDecision {
    pub name: String,
    pub args: Value,
}

/// Best-effort JSON recovery from free text
///
/// Strips code-fence markers and tries a direct parse; on failure, retries
/// on the first-`{`-to-last-`}` span. Returns `None` when no JSON value can
/// be recovered.
pub fn lenient_json(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }

    let cleaned = text.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    if let Ok(value) = serde_json::from_str::<Value>(cleaned) {
        return Some(value);
    }

    let brace_span = Regex::new(r"(?s)\{.*\}").ok()?;
    let candidate = brace_span.find(cleaned)?;
    match serde_json::from_str::<Value>(candidate.as_str()) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "router output contained no parseable JSON");
            None
        }
    }
}

/// Extract the tool name and argument mapping from a parsed decision
///
/// The name is accepted under `function` or `function_name`, the arguments
/// under `args` or `parameters`. A missing name makes the decision
/// unroutable.
pub fn extract_decision(value: &Value) -> Option<RouterDecision> {
    let name = value
        .get("function")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .or_else(|| {
            value
                .get("function_name")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
        })?
        .to_string();

    let non_empty = |v: &&Value| v.as_object().is_some_and(|map| !map.is_empty());
    let args = value
        .get("args")
        .filter(non_empty)
        .or_else(|| value.get("parameters").filter(non_empty))
        .cloned()
        .unwrap_or_else(|| json!({}));

    Some(RouterDecision { name, args })
}

/// Normalize a decision into a canonical tool call
///
/// Unknown tool names and missing required arguments yield `None`.
pub fn normalize(decision: RouterDecision) -> Option<ToolCall> {
    let RouterDecision { name, args } = decision;

    match name.as_str() {
        "count_patients" => Some(normalize_count_args(&args)),
        "semantic_retrieve" => {
            let query = args.get("query").and_then(Value::as_str)?.to_string();
            let top_k = args
                .get("topk")
                .and_then(as_count)
                .unwrap_or(5);
            Some(ToolCall::SemanticRetrieve { query, top_k })
        }
        "get_avg_stay" => {
            let condition = args.get("condition").and_then(Value::as_str)?.to_string();
            Some(ToolCall::AvgStay { condition })
        }
        "compare_stay" => {
            let first = args.get("cond1").and_then(Value::as_str)?.to_string();
            let second = args.get("cond2").and_then(Value::as_str)?.to_string();
            Some(ToolCall::CompareStay { first, second })
        }
        other => {
            tracing::warn!(tool = other, "router selected an unknown tool");
            None
        }
    }
}

/// Recover and normalize a tool call from raw router text
pub fn interpret(raw: &str) -> Option<ToolCall> {
    let value = lenient_json(raw)?;
    let decision = extract_decision(&value)?;
    normalize(decision)
}

/// Standardize `count_patients` arguments into one filter mapping
///
/// Accepts either a ready-made `filter_obj`, or the flat
/// `{ condition, min_stay_days }` shape, which becomes an exact-match
/// condition field plus an exclusive greater-than stay clause. The condition
/// string is capitalized either way before it reaches the store.
fn normalize_count_args(args: &Value) -> ToolCall {
    let mut filter = args
        .get("filter_obj")
        .filter(|v| v.is_object())
        .cloned()
        .unwrap_or_else(|| json!({}));

    if args.get("condition").is_some() || args.get("min_stay_days").is_some() {
        if let Some(condition) = args.get("condition").and_then(Value::as_str) {
            if let Some(map) = filter.as_object_mut() {
                map.insert(
                    "Medical Condition".to_string(),
                    Value::String(capitalize(condition)),
                );
            }
        }

        if let Some(days) = args.get("min_stay_days").and_then(as_integer_days) {
            if let Some(map) = filter.as_object_mut() {
                map.insert("stay_length".to_string(), json!({ "$gt": days }));
            }
        }
    }

    let capitalized = filter
        .get("Medical Condition")
        .and_then(Value::as_str)
        .map(capitalize);
    if let (Some(condition), Some(map)) = (capitalized, filter.as_object_mut()) {
        map.insert("Medical Condition".to_string(), Value::String(condition));
    }

    ToolCall::CountPatients { filter }
}

/// First letter uppercased, the rest lowered
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// A stay threshold as a whole number of days
fn as_integer_days(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// A result-count argument as usize
fn as_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|u| u as usize)
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as usize)),
        Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    }
}
