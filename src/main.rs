//! MediOps - hospital operations front desk
//!
//! A Central Manager routes each request to one of four specialist agents
//! (Admission, Scheduling, Pharmacy, Billing) via Gemini function calling,
//! and the chosen agent answers in its own persona.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use mediops::config::{self, Config, Settings, SettingsArgs};
use mediops::{repl, server};

#[derive(Parser)]
#[command(name = "mediops")]
#[command(about = "Hospital operations front desk with specialist LLM agents")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    settings: SettingsArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the browser chat UI
    Serve,
    /// Interactive terminal chat (default)
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from ~/.mediops/.env or current dir)
    let env_path = Some(config::config_dir().join(".env")).filter(|p| p.exists());
    if let Some(path) = env_path {
        let _ = dotenvy::from_path(&path);
    } else {
        let _ = dotenvy::dotenv();
    }

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mediops=info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::resolve(args.settings, Config::load());

    println!();
    println!("  MediOps AI {}", env!("CARGO_PKG_VERSION"));
    println!("{}", repl::separator(50));

    match args.command.unwrap_or(Command::Chat) {
        Command::Serve => {
            let router = if settings.has_api_key() {
                let session = Arc::new(mediops::build_session(&settings)?);
                server::create_router(server::AppState {
                    session,
                    model: settings.model.clone(),
                })
            } else {
                tracing::error!("GEMINI_API_KEY missing; serving configuration error page");
                server::config_error_router()
            };
            server::run(router, &settings.host, settings.port).await
        }
        Command::Chat => {
            if !settings.has_api_key() {
                repl::print_config_error();
                std::process::exit(2);
            }
            let session = Arc::new(mediops::build_session(&settings)?);
            repl::Repl::new(session, settings.model.clone())?.run().await
        }
    }
}
