// src/llm/mod.rs
// LLM inference client abstraction (Gemini generateContent)

mod gemini;

pub use gemini::{GeminiClient, API_KEY_HEADER, DEFAULT_API_BASE, DEFAULT_MODEL};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// A callable function offered to the model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// One single-turn generation request
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// System instruction (persona)
    pub system: String,
    /// The user turn
    pub input: String,
    pub tools: Vec<FunctionDeclaration>,
    pub temperature: f32,
}

/// A function invocation chosen by the model
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Value,
}

impl FunctionCall {
    /// Read a string argument, ignoring absent, non-string, or blank values
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.args
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

/// What the model returned for the first candidate
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub text: Option<String>,
    pub function_call: Option<FunctionCall>,
}

/// Trait for LLM clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one generation request; no retries
    async fn generate(&self, request: GenerateRequest) -> Result<Generation>;

    /// Model name, for logging and status
    fn model_name(&self) -> String;
}
