// src/session.rs
// Turn orchestration: route, record the delegation, execute, record the reply

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::department::Department;
use crate::executor::Execute;
use crate::router::{DelegationResult, Route};
use crate::transcript::{Message, Transcript};

pub const CLARIFICATION_MESSAGE: &str = "I'm not sure which department handles that. Could you please specify if this is related to Admissions, Scheduling, Pharmacy, or Billing?";

pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request. Please ensure your API Key is valid.";

/// Cosmetic pause between routing and execution
pub const DEFAULT_HANDOFF_DELAY: Duration = Duration::from_millis(800);

/// Why a submission was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Empty,
    Busy,
}

/// Result of submitting user input
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The turn ran; `messages` are the entries it appended, user message first
    Completed {
        messages: Vec<Message>,
        active: Department,
    },
    /// Nothing happened
    Rejected(Rejection),
}

/// View state of one chat session
#[derive(Debug, Clone, Serialize)]
pub struct ChatState {
    pub transcript: Transcript,
    pub busy: bool,
    pub active: Department,
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::with_welcome(),
            busy: false,
            active: Department::Central,
        }
    }

    /// Accept user input and mark the session busy.
    /// Returns the transcript index where this turn starts.
    pub fn begin_turn(&mut self, input: &str) -> Result<usize, Rejection> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Rejection::Empty);
        }
        if self.busy {
            return Err(Rejection::Busy);
        }

        let start = self.transcript.len();
        self.transcript.push(Message::user(input));
        self.busy = true;
        self.active = Department::Central;
        Ok(start)
    }

    pub fn record_delegation(&mut self, delegation: &DelegationResult) {
        self.transcript
            .push(Message::delegation_notice(delegation.target, delegation.reason.clone()));
        self.active = delegation.target;
    }

    pub fn record_reply(&mut self, department: Department, body: impl Into<String>) {
        self.transcript.push(Message::assistant(department, body));
    }

    pub fn record_clarification(&mut self) {
        self.transcript
            .push(Message::assistant(Department::Central, CLARIFICATION_MESSAGE));
    }

    pub fn record_failure(&mut self) {
        self.transcript
            .push(Message::system(Some(Department::Central), GENERIC_ERROR_MESSAGE));
    }

    /// Clear the busy flag and return what the turn appended
    pub fn finish_turn(&mut self, start: usize) -> Vec<Message> {
        self.busy = false;
        self.transcript.since(start).to_vec()
    }

    /// Progress label while a turn is in flight
    pub fn processing_step(&self) -> Option<String> {
        if !self.busy {
            return None;
        }
        let delegated = self.transcript.last().map(|m| m.delegation).unwrap_or(false);
        if delegated {
            Some(format!("{} is working...", self.active))
        } else {
            Some("Analyzing request...".to_string())
        }
    }
}

/// One conversation: transcript, busy flag, and the router/executor pair
pub struct ChatSession {
    state: Arc<Mutex<ChatState>>,
    router: Arc<dyn Route>,
    executor: Arc<dyn Execute>,
    handoff_delay: Duration,
}

impl ChatSession {
    pub fn new(router: Arc<dyn Route>, executor: Arc<dyn Execute>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChatState::new())),
            router,
            executor,
            handoff_delay: DEFAULT_HANDOFF_DELAY,
        }
    }

    pub fn with_handoff_delay(mut self, delay: Duration) -> Self {
        self.handoff_delay = delay;
        self
    }

    /// Run one turn. Empty input or a turn already in flight is a no-op.
    ///
    /// The turn runs on its own task and always clears the busy flag, even
    /// when the caller stops waiting (e.g. the browser disconnects).
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let start = match self.state.lock().await.begin_turn(input) {
            Ok(start) => start,
            Err(rejection) => return SubmitOutcome::Rejected(rejection),
        };
        info!("Turn started");

        let turn = Turn {
            state: Arc::clone(&self.state),
            router: Arc::clone(&self.router),
            executor: Arc::clone(&self.executor),
            handoff_delay: self.handoff_delay,
        };
        let input = input.trim().to_string();

        let (messages, active) = match tokio::spawn(turn.run(start, input)).await {
            Ok(finished) => finished,
            Err(e) => {
                error!(error = %e, "Turn task aborted");
                let mut state = self.state.lock().await;
                state.record_failure();
                (state.finish_turn(start), state.active)
            }
        };

        SubmitOutcome::Completed { messages, active }
    }

    /// Copy of the current view state
    pub async fn snapshot(&self) -> ChatState {
        self.state.lock().await.clone()
    }

    pub async fn is_busy(&self) -> bool {
        self.state.lock().await.busy
    }
}

/// Everything a detached turn needs
struct Turn {
    state: Arc<Mutex<ChatState>>,
    router: Arc<dyn Route>,
    executor: Arc<dyn Execute>,
    handoff_delay: Duration,
}

impl Turn {
    async fn run(self, start: usize, input: String) -> (Vec<Message>, Department) {
        if let Err(e) = self.route_and_execute(&input).await {
            error!(error = %e, "Turn failed");
            self.state.lock().await.record_failure();
        }

        let mut state = self.state.lock().await;
        let messages = state.finish_turn(start);
        info!(appended = messages.len(), active = %state.active, "Turn finished");
        (messages, state.active)
    }

    async fn route_and_execute(&self, input: &str) -> crate::error::Result<()> {
        let delegation = self.router.route(input).await?;
        self.state.lock().await.record_delegation(&delegation);

        if delegation.target.is_central() {
            self.state.lock().await.record_clarification();
            return Ok(());
        }

        if !self.handoff_delay.is_zero() {
            tokio::time::sleep(self.handoff_delay).await;
        }

        let reply = self
            .executor
            .execute(delegation.target, &delegation.context)
            .await?;
        self.state.lock().await.record_reply(delegation.target, reply);
        Ok(())
    }
}
