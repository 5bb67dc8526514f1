// src/transcript.rs
// In-memory conversation transcript (append-only)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::department::Department;

/// Greeting shown at the top of every new conversation
pub const WELCOME_MESSAGE: &str = "Hello. I am the **Central Manager** for Hospital Operations. I can help you with Patient Admissions, Scheduling, Pharmacy, or Billing.\n\n*How may I assist you today?*";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One entry in the transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<Department>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub delegation: bool,
}

impl Message {
    fn new(role: Role, body: impl Into<String>, department: Option<Department>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            body: body.into(),
            department,
            timestamp: Utc::now(),
            delegation: false,
        }
    }

    pub fn user(body: impl Into<String>) -> Self {
        Self::new(Role::User, body, None)
    }

    pub fn assistant(department: Department, body: impl Into<String>) -> Self {
        Self::new(Role::Assistant, body, Some(department))
    }

    pub fn system(department: Option<Department>, body: impl Into<String>) -> Self {
        Self::new(Role::System, body, department)
    }

    /// Record of which department the router picked and why
    pub fn delegation_notice(department: Department, reason: impl Into<String>) -> Self {
        Self {
            delegation: true,
            ..Self::new(Role::System, reason, Some(department))
        }
    }
}

/// Ordered, append-only message log for one session
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript seeded with the Central Manager greeting
    pub fn with_welcome() -> Self {
        let mut transcript = Self::new();
        transcript.push(Message::assistant(Department::Central, WELCOME_MESSAGE));
        transcript
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages appended at or after `index`
    pub fn since(&self, index: usize) -> &[Message] {
        self.messages.get(index..).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }
}
