// src/server/assets.rs
// Static pages compiled into the binary

/// Chat UI: sidebar, message list, input bar
pub const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Full-screen page shown when GEMINI_API_KEY is missing
pub const CONFIG_ERROR_HTML: &str = include_str!("../../assets/config_error.html");
