// src/lib.rs

pub mod config;
pub mod department;
pub mod error;
pub mod executor;
pub mod llm;
pub mod repl;
pub mod router;
pub mod server;
pub mod session;
pub mod transcript;

pub use department::Department;
pub use error::{MediOpsError, Result};
pub use router::DelegationResult;
pub use session::{ChatSession, SubmitOutcome};

use std::sync::Arc;

/// Wire a Gemini-backed router and executor into a fresh session
pub fn build_session(settings: &config::Settings) -> Result<ChatSession> {
    let llm: Arc<dyn llm::LlmClient> = Arc::new(llm::GeminiClient::with_options(
        settings.api_key()?.to_string(),
        settings.model.clone(),
        settings.api_base.clone(),
        settings.timeout,
    )?);

    let router = Arc::new(router::CentralRouter::new(Arc::clone(&llm)));
    let executor = Arc::new(executor::AgentExecutor::new(llm));

    Ok(ChatSession::new(router, executor).with_handoff_delay(settings.handoff_delay))
}
