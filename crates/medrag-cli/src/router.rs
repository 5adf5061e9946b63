//! Query router: ask the model which tool answers a question

use std::sync::Arc;

use medrag_core::{ChatConfig, ChatLlm, ChatMessage, Result};

/// Fixed instruction prompt for the routing call
pub const ROUTING_PROMPT: &str = r#"You are the query router of a hospital records assistant.

YOU MUST FOLLOW THESE RULES STRICTLY:

1. Reply ONLY in clean JSON.
2. NO markdown. NO backticks. NO explanations. NO comments.
3. Only output this structure:

{
  "function": "<tool_name>",
  "args": { ... }
}

VALID TOOLS & ARGUMENTS:

1. semantic_retrieve
   args: { "query": "<text>", "topk": 5 }

2. get_avg_stay
   args: { "condition": "<condition>" }

3. count_patients
   args: {
     "filter_obj": {
         "Medical Condition": "<condition>",
         "stay_length": { "$gt" or "$lt" or "$gte" or "$lte": <number> }
     }
   }

4. compare_stay
   args: { "cond1": "<condition>", "cond2": "<condition>" }

ROUTING RULES:
- If the question contains "how many", "count", "number" -> count_patients
- If the question asks for an average stay -> get_avg_stay
- If the question compares two conditions -> compare_stay
- If the question is fuzzy or descriptive -> semantic_retrieve
"#;

/// Router sending the user's question plus the fixed instruction prompt to
/// the model
///
/// The model's reply is returned verbatim; interpreting it is the
/// executor's job, so malformed output is deferred rather than validated
/// here.
pub struct QueryRouter<L: ChatLlm> {
    llm: Arc<L>,
}

impl<L: ChatLlm> QueryRouter<L> {
    /// Create a router over the given LLM handle
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    /// Ask the model to pick a tool for a question; returns its raw text
    pub async fn route(&self, question: &str) -> Result<String> {
        let messages = [
            ChatMessage::system(ROUTING_PROMPT),
            ChatMessage::user(question),
        ];
        let config = ChatConfig::deterministic(self.llm.model_id());
        self.llm.chat(&messages, &config).await
    }
}
