//! DeepSeek configuration

use medrag_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for the DeepSeek chat client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl DeepSeekConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("DEEPSEEK_API_KEY")
            .or_else(|_| env::var("LLM_API_KEY"))
            .map_err(|_| {
                Error::Configuration(
                    "DEEPSEEK_API_KEY or LLM_API_KEY environment variable not found".to_string(),
                )
            })?;

        let api_url =
            env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| "https://api.deepseek.com".to_string());

        let model = env::var("DEEPSEEK_MODEL").unwrap_or_else(|_| "deepseek-chat".to_string());

        Ok(Self {
            api_key,
            api_url,
            model,
        })
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_url: "https://api.deepseek.com".to_string(),
            model: "deepseek-chat".to_string(),
        }
    }
}
