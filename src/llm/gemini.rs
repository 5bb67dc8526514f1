// src/llm/gemini.rs
// Google Gemini generateContent client (non-streaming, supports function calling)

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use super::{FunctionCall, FunctionDeclaration, GenerateRequest, Generation, LlmClient};
use crate::error::{MediOpsError, Result};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fast model, used for both routing and execution
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini API client
pub struct GeminiClient {
    client: HttpClient,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    /// Create a new Gemini client with the default model and endpoint
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_options(
            api_key,
            DEFAULT_MODEL.to_string(),
            DEFAULT_API_BASE.to_string(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client with a custom model, endpoint and request timeout
    pub fn with_options(
        api_key: String,
        model: String,
        api_base: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MediOpsError::Http(e.without_url()))?;

        Ok(Self {
            client,
            api_key,
            model,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.api_base, self.model)
    }

    /// Build the wire request for a single-turn generation
    fn build_request(request: GenerateRequest) -> GeminiRequest {
        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(vec![GeminiTool {
                function_declarations: request.tools,
            }])
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiTextPart { text: request.input }],
            }],
            system_instruction: Some(GeminiSystemInstruction {
                parts: vec![GeminiTextPart { text: request.system }],
            }),
            tools,
            generation_config: GeminiGenerationConfig {
                temperature: request.temperature,
            },
        }
    }

    /// Parse the first candidate into a Generation.
    /// A missing candidate, or a candidate without content parts, is an error.
    fn parse_response(response: GeminiResponse) -> Result<Generation> {
        if let Some(error) = response.error {
            return Err(MediOpsError::Api {
                status: error.code.unwrap_or(0),
                body: error.message,
            });
        }

        let candidate = response
            .candidates
            .and_then(|c| c.into_iter().next())
            .ok_or_else(|| MediOpsError::EmptyResponse("no candidates".into()))?;

        let parts = candidate
            .content
            .and_then(|c| c.parts)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| MediOpsError::EmptyResponse("candidate has no content parts".into()))?;

        let mut text = String::new();
        let mut function_call = None;

        for part in parts {
            if part.thought {
                continue;
            }
            if let Some(t) = part.text {
                text.push_str(&t);
            }
            if function_call.is_none() {
                if let Some(fc) = part.function_call {
                    function_call = Some(FunctionCall {
                        name: fc.name,
                        args: fc.args.unwrap_or(Value::Null),
                    });
                }
            }
        }

        Ok(Generation {
            text: if text.is_empty() { None } else { Some(text) },
            function_call,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    #[instrument(skip(self, request), fields(model = %self.model, tool_count = request.tools.len(), temperature = request.temperature))]
    async fn generate(&self, request: GenerateRequest) -> Result<Generation> {
        let start_time = Instant::now();
        let api_request = Self::build_request(request);
        debug!("Gemini request: {}", serde_json::to_string(&api_request)?);

        // Key travels in a header so it never shows up in error URLs
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&api_request)
            .send()
            .await
            .map_err(strip_url)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MediOpsError::Api { status, body });
        }

        let body = response.text().await.map_err(strip_url)?;
        let api_response: GeminiResponse = serde_json::from_str(&body)?;
        let generation = Self::parse_response(api_response)?;

        info!(
            duration_ms = start_time.elapsed().as_millis() as u64,
            function_call = generation.function_call.as_ref().map(|fc| fc.name.as_str()).unwrap_or("-"),
            text_chars = generation.text.as_ref().map(|t| t.len()).unwrap_or(0),
            "Gemini request complete"
        );

        Ok(generation)
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}

fn strip_url(e: reqwest::Error) -> MediOpsError {
    MediOpsError::Http(e.without_url())
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<GeminiTool>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiTextPart>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiTextPart>,
}

#[derive(Serialize)]
struct GeminiTextPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiTool {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    parts: Option<Vec<GeminiPartResponse>>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
    #[serde(default)]
    thought: bool,
    #[serde(rename = "functionCall")]
    function_call: Option<GeminiFunctionCallResponse>,
}

#[derive(Deserialize)]
struct GeminiFunctionCallResponse {
    name: String,
    args: Option<Value>,
}

#[derive(Deserialize)]
struct GeminiError {
    code: Option<u16>,
    message: String,
}
