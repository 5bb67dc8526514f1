// src/router.rs
// Central Manager routing: ask the model which specialist should take a request

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::department::{Department, CENTRAL_MANAGER_INSTRUCTION};
use crate::error::Result;
use crate::llm::{FunctionDeclaration, GenerateRequest, LlmClient};

/// Routing is deterministic
pub const ROUTING_TEMPERATURE: f32 = 0.0;

pub const DEFAULT_REASON: &str = "Delegated based on intent.";
pub const UNDETERMINED_REASON: &str = "Could not determine specialized agent. Please clarify.";
pub const ROUTING_ERROR_REASON: &str = "System Error during routing.";

/// The router's decision for one user turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelegationResult {
    pub target: Department,
    pub context: String,
    pub reason: String,
}

impl DelegationResult {
    /// Stay at the front desk
    pub fn central(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: Department::Central,
            context: context.into(),
            reason: reason.into(),
        }
    }
}

/// Picks a department for a user request
#[async_trait]
pub trait Route: Send + Sync {
    async fn route(&self, input: &str) -> Result<DelegationResult>;
}

/// Function declarations offered to the Central Manager, one per specialist
pub fn delegation_tools() -> Vec<FunctionDeclaration> {
    Department::SPECIALISTS
        .iter()
        .filter_map(|dept| {
            let name = dept.tool_name()?;
            let description = dept.tool_description()?;
            Some(FunctionDeclaration {
                name: name.to_string(),
                description: description.to_string(),
                parameters: json!({
                    "type": "OBJECT",
                    "properties": {
                        "context": {
                            "type": "STRING",
                            "description": "The full context and details of the user request to be passed to the agent."
                        },
                        "reason": {
                            "type": "STRING",
                            "description": "Brief reason why this agent was selected."
                        }
                    },
                    "required": ["context", "reason"]
                }),
            })
        })
        .collect()
}

/// Router backed by an LLM with function calling
pub struct CentralRouter {
    llm: Arc<dyn LlmClient>,
}

impl CentralRouter {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Classify a request. Never fails: any error degrades to the Central Manager.
    pub async fn delegate(&self, input: &str) -> DelegationResult {
        let request = GenerateRequest {
            system: CENTRAL_MANAGER_INSTRUCTION.to_string(),
            input: input.to_string(),
            tools: delegation_tools(),
            temperature: ROUTING_TEMPERATURE,
        };

        let generation = match self.llm.generate(request).await {
            Ok(g) => g,
            Err(e) => {
                warn!(error = %e, "Routing error");
                return DelegationResult::central(input, ROUTING_ERROR_REASON);
            }
        };

        let Some(call) = generation.function_call else {
            info!("Router made no delegation");
            return DelegationResult::central(input, UNDETERMINED_REASON);
        };

        let target = Department::from_tool_name(&call.name).unwrap_or_else(|| {
            warn!(tool = %call.name, "Router called an unknown function");
            Department::Central
        });

        let result = DelegationResult {
            target,
            context: call.str_arg("context").unwrap_or(input).to_string(),
            reason: call.str_arg("reason").unwrap_or(DEFAULT_REASON).to_string(),
        };

        info!(department = %result.target, reason = %result.reason, "Request delegated");
        result
    }
}

#[async_trait]
impl Route for CentralRouter {
    async fn route(&self, input: &str) -> Result<DelegationResult> {
        Ok(self.delegate(input).await)
    }
}
