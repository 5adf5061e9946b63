//! Explainer: phrase a raw tool result as a natural-language answer

use std::sync::Arc;

use medrag_core::{ChatConfig, ChatLlm, ChatMessage, Error, Result, ToolOutput};

const EXPLAINER_PROMPT: &str =
    "You explain the tool result only. Do not invent facts beyond it.";

/// Explainer sending the question and the serialized tool result back to
/// the model
pub struct AnswerExplainer<L: ChatLlm> {
    llm: Arc<L>,
}

impl<L: ChatLlm> AnswerExplainer<L> {
    /// Create an explainer over the given LLM handle
    pub fn new(llm: Arc<L>) -> Self {
        Self { llm }
    }

    /// Ask the model to explain a tool result; absence serializes as `null`
    pub async fn explain(&self, question: &str, result: Option<&ToolOutput>) -> Result<String> {
        let result_text = render_result(result)?;

        let messages = [
            ChatMessage::system(EXPLAINER_PROMPT),
            ChatMessage::user(question),
            ChatMessage::system(format!("tool_result: {}", result_text)),
        ];
        let config = ChatConfig::creative(self.llm.model_id());
        self.llm.chat(&messages, &config).await
    }
}

/// Serialize a tool result for the model; an absent result becomes `null`
pub fn render_result(result: Option<&ToolOutput>) -> Result<String> {
    match result {
        Some(output) => {
            serde_json::to_string(output).map_err(|e| Error::Serialization(e.to_string()))
        }
        None => Ok("null".to_string()),
    }
}
