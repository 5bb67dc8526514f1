//! Rustyline helper: slash-command and department-key completion

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper};
use std::borrow::Cow;

use crate::department::Department;

/// Slash commands for tab completion
pub const SLASH_COMMANDS: &[&str] = &[
    "/help",
    "/departments",
    "/transcript",
    "/status",
    "/quit",
    "/exit",
];

/// Commands whose argument is a department key
const DEPARTMENT_COMMANDS: &[&str] = &["/departments"];

pub struct ReplHelper {
    history: HistoryHinter,
}

impl ReplHelper {
    pub fn new() -> Self {
        Self {
            history: HistoryHinter::new(),
        }
    }
}

/// Candidates for the word ending at `pos`, with the byte offset it starts at.
///
/// At the start of a line that means slash commands; after a department
/// command it means department keys. Free text gets nothing.
pub fn completions(line: &str, pos: usize) -> (usize, Vec<&'static str>) {
    let line = &line[..pos.min(line.len())];
    if !line.starts_with('/') {
        return (pos, Vec::new());
    }

    let Some((command, arg)) = line.split_once(' ') else {
        let commands = SLASH_COMMANDS
            .iter()
            .copied()
            .filter(|cmd| cmd.starts_with(line))
            .collect();
        return (0, commands);
    };

    if !DEPARTMENT_COMMANDS.contains(&command) {
        return (pos, Vec::new());
    }

    let arg = arg.trim_start();
    if arg.contains(' ') {
        return (pos, Vec::new());
    }
    let prefix = arg.to_lowercase();
    let keys = Department::ALL
        .iter()
        .map(|d| d.key())
        .filter(|key| key.starts_with(&prefix))
        .collect();
    (line.len() - arg.len(), keys)
}

impl Completer for ReplHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, candidates) = completions(line, pos);
        let pairs = candidates
            .into_iter()
            .map(|c| Pair {
                display: c.to_string(),
                replacement: c.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ReplHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<String> {
        if !line.starts_with('/') {
            return self.history.hint(line, pos, ctx);
        }
        if pos < line.len() {
            return None;
        }

        // Only a unique completion is worth showing inline
        let (start, candidates) = completions(line, pos);
        match candidates.as_slice() {
            [only] => only.get(pos - start..).filter(|rest| !rest.is_empty()).map(String::from),
            _ => None,
        }
    }
}

impl Highlighter for ReplHelper {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("\x1b[2m{}\x1b[0m", hint))
    }
}

impl Validator for ReplHelper {}

impl Helper for ReplHelper {}
