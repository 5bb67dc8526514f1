//! ANSI color helpers for terminal output

use crate::department::Department;

/// ANSI escape codes
pub mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const WHITE: &str = "\x1b[37m";
    pub const GRAY: &str = "\x1b[90m";
}

use ansi::*;

/// Accent colour for a department (mirrors the browser UI accents)
pub fn accent(department: Department) -> &'static str {
    match department {
        Department::Central => WHITE,
        Department::Admission => BLUE,
        Department::Scheduling => MAGENTA,
        Department::Pharmacy => GREEN,
        Department::Billing => YELLOW,
    }
}

/// Department name in its accent colour
pub fn department(department: Department) -> String {
    format!("{}{}{}{}", BOLD, accent(department), department.display_name(), RESET)
}

/// Format a delegation notice line
pub fn delegation(target: Department, reason: &str) -> String {
    format!(
        "{}→{} {}{}:{} {}{}{}",
        CYAN, RESET, self::department(target), DIM, RESET, GRAY, reason, RESET
    )
}

/// Format an error message (red)
pub fn error(msg: &str) -> String {
    format!("{}{}{}", RED, msg, RESET)
}

/// Format a warning message (yellow)
pub fn warning(msg: &str) -> String {
    format!("{}{}{}", YELLOW, msg, RESET)
}

/// Format a status/info message (gray)
pub fn status(msg: &str) -> String {
    format!("{}{}{}", GRAY, msg, RESET)
}

/// Format the prompt
pub fn prompt() -> String {
    format!("{}{}>>> {}", BOLD, MAGENTA, RESET)
}

/// Format a horizontal separator
pub fn separator(width: usize) -> String {
    format!("{}{}{}", DIM, "─".repeat(width), RESET)
}

/// Format startup banner line
pub fn banner_line(label: &str, value: &str) -> String {
    format!("{}{:<12}{} {}", DIM, label, RESET, value)
}
