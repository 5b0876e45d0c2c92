//! Generative backend configuration from TOML (`[llm]` section)
//!
//! Any OpenAI-compatible chat completions endpoint works. The API key is
//! never stored in the file; `api_key_env` names the variable holding it.

use serde::{Deserialize, Serialize};

/// Raw LLM backend configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    /// HTTP request timeout for the whole completion
    pub timeout_seconds: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            temperature: 0.6,
            top_p: 1.0,
            max_tokens: 1024,
            timeout_seconds: 120,
        }
    }
}

impl FileLlmConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
