// src/executor.rs
// Specialist execution: answer a delegated request in a department's persona

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::department::Department;
use crate::error::Result;
use crate::llm::{GenerateRequest, LlmClient};

/// Specialists may phrase things freely
pub const EXECUTION_TEMPERATURE: f32 = 0.7;

pub const NO_TEXT_REPLY: &str = "Agent processed the request but returned no text.";

/// In-band error shown when a specialist fails
pub fn failure_reply(department: Department) -> String {
    format!("Error: {} failed to process request.", department.display_name())
}

/// Produces a specialist's reply for a delegated request
#[async_trait]
pub trait Execute: Send + Sync {
    async fn execute(&self, department: Department, context: &str) -> Result<String>;
}

/// Executor backed by an LLM
pub struct AgentExecutor {
    llm: Arc<dyn LlmClient>,
}

impl AgentExecutor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Run the task. Never fails: errors become a displayable string.
    pub async fn run(&self, department: Department, context: &str) -> String {
        let request = GenerateRequest {
            system: department.persona().to_string(),
            input: context.to_string(),
            tools: Vec::new(),
            temperature: EXECUTION_TEMPERATURE,
        };

        match self.llm.generate(request).await {
            Ok(generation) => {
                info!(department = %department, "Agent replied");
                generation.text.unwrap_or_else(|| NO_TEXT_REPLY.to_string())
            }
            Err(e) => {
                warn!(department = %department, error = %e, "Execution error");
                failure_reply(department)
            }
        }
    }
}

#[async_trait]
impl Execute for AgentExecutor {
    async fn execute(&self, department: Department, context: &str) -> Result<String> {
        Ok(self.run(department, context).await)
    }
}
