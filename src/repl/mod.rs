//! Interactive REPL for MediOps
//!
//! Provides a readline-based interface with:
//! - Command history
//! - Slash command completion
//! - Department-coloured delegation notices and replies

mod colors;
mod helper;

pub use colors::separator;

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::path::PathBuf;
use std::sync::Arc;

use crate::department::Department;
use crate::session::{ChatSession, Rejection, SubmitOutcome};
use crate::transcript::{Message, Role};

use colors::ansi::*;
use helper::ReplHelper;

/// REPL state
pub struct Repl {
    /// Readline editor with history and completion
    editor: Editor<ReplHelper, DefaultHistory>,
    session: Arc<ChatSession>,
    model: String,
    /// History file path
    history_path: PathBuf,
}

impl Repl {
    pub fn new(session: Arc<ChatSession>, model: String) -> Result<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(ReplHelper::new()));

        Ok(Self {
            editor,
            session,
            model,
            history_path: crate::config::config_dir().join("chat_history"),
        })
    }

    /// Load command history
    fn load_history(&mut self) {
        if self.history_path.exists() {
            let _ = self.editor.load_history(&self.history_path);
        }
    }

    /// Save command history
    fn save_history(&mut self) {
        if let Some(parent) = self.history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = self.editor.save_history(&self.history_path);
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        self.load_history();

        println!("{}", colors::banner_line("Model", &self.model));
        println!("{}", colors::banner_line("History", &self.history_path.display().to_string()));
        println!("{}", separator(50));
        println!();

        // Greeting from the fresh transcript
        for message in self.session.snapshot().await.transcript.iter() {
            print_message(message);
        }
        println!("{}", colors::status("Type your request (Ctrl+D to exit, /help for commands)"));
        println!();

        loop {
            match self.editor.readline(&colors::prompt()) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    self.editor.add_history_entry(&line)?;

                    if trimmed.starts_with('/') {
                        if !self.handle_command(trimmed).await {
                            break;
                        }
                        continue;
                    }

                    self.process_input(&line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("{}", colors::error(&format!("Error: {:?}", err)));
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    /// Handle slash commands. Returns false when the REPL should exit.
    async fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd.split_whitespace().next().unwrap_or(cmd) {
            "/help" => {
                println!("Commands:");
                println!("  /departments       - List departments and highlight the active one");
                println!("  /departments <key> - Show one department (Tab completes keys)");
                println!("  /transcript        - Show the whole conversation");
                println!("  /status            - Show model and session state");
                println!("  /quit              - Exit");
            }
            "/departments" => {
                let active = self.session.snapshot().await.active;
                match cmd.split_whitespace().nth(1) {
                    None => {
                        for dept in Department::ALL {
                            let marker = if dept == active { "●" } else { " " };
                            println!("  {} {:<18} {}", marker, dept.label(), colors::department(dept));
                        }
                    }
                    Some(key) => match Department::from_key(key) {
                        Some(dept) => print_department(dept, dept == active),
                        None => println!("{}", colors::warning(&format!("Unknown department: {}", key))),
                    },
                }
            }
            "/transcript" => {
                for message in self.session.snapshot().await.transcript.iter() {
                    print_message(message);
                }
            }
            "/status" => {
                let snapshot = self.session.snapshot().await;
                println!("{}", colors::banner_line("Model", &self.model));
                println!("{}", colors::banner_line("Active", snapshot.active.display_name()));
                println!("{}", colors::banner_line("Messages", &snapshot.transcript.len().to_string()));
                println!("{}", colors::banner_line("Busy", &snapshot.busy.to_string()));
            }
            "/quit" | "/exit" => return false,
            other => {
                println!("{}", colors::warning(&format!("Unknown command: {}", other)));
            }
        }
        true
    }

    /// Run one turn and print what it appended
    async fn process_input(&mut self, input: &str) {
        println!("{}", colors::status("Analyzing request..."));

        match self.session.submit(input).await {
            SubmitOutcome::Completed { messages, .. } => {
                // First entry is the user's own message, already on screen
                for message in messages.iter().skip(1) {
                    print_message(message);
                }
            }
            SubmitOutcome::Rejected(Rejection::Busy) => {
                println!("{}", colors::warning("Still working on the previous request."));
            }
            SubmitOutcome::Rejected(Rejection::Empty) => {}
        }
    }
}

/// Print one transcript entry
fn print_message(message: &Message) {
    let department = message.department.unwrap_or(Department::Central);

    if message.delegation {
        println!("{}", colors::delegation(department, &message.body));
        return;
    }

    let time = message.timestamp.with_timezone(&chrono::Local).format("%H:%M");
    match message.role {
        Role::User => {
            println!("{}Administrator{} {}{}{}", BOLD, RESET, GRAY, time, RESET);
            println!("{}", message.body);
        }
        Role::Assistant => {
            println!("{} {}{}{}", colors::department(department), GRAY, time, RESET);
            println!("{}", message.body);
        }
        Role::System => {
            println!("{}", colors::error(&message.body));
        }
    }
    println!();
}

/// Details of one department
fn print_department(dept: Department, active: bool) {
    println!("{}", colors::department(dept));
    println!("{}", colors::banner_line("Key", dept.key()));
    println!("{}", colors::banner_line("Label", dept.label()));
    println!("{}", colors::banner_line("Delegation", dept.tool_name().unwrap_or("-")));
    println!("{}", colors::banner_line("Active", &active.to_string()));
    if let Some(description) = dept.tool_description() {
        println!("  {}", description);
    }
}

/// Full-screen notice shown instead of the chat when no API key is configured
pub fn print_config_error() {
    println!();
    println!("{}", colors::error("  Configuration Missing"));
    println!("{}", separator(50));
    println!("  The {}GEMINI_API_KEY{} environment variable is missing.", BOLD, RESET);
    println!("  This application requires a valid Google Gemini API key to function.");
    println!();
    println!("  Set it via --api-key, the environment, or {}", crate::config::config_path().display());
    println!("{}", separator(50));
}
