//! Intervox application binary - composition root.
//!
//! Ties the crates together into an interactive terminal session:
//! 1. Parse CLI args and initialize tracing
//! 2. Load configuration from TOML
//! 3. Build the response resolver over the HTTP completion backend
//! 4. Start the conversation orchestrator
//! 5. Run a line-based REPL against it
//!
//! A plain terminal offers neither speech-to-text nor text-to-speech, so both
//! capabilities are wired as `Unavailable` and the session degrades to
//! text-only, which is exactly the worst-case behavior the engine promises.

mod cli;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use intervox_core::config::IntervoxConfig;
use intervox_core::events::SessionEvent;
use intervox_core::types::{Language, Sender};
use intervox_reply::remote::HttpCompletionClient;
use intervox_reply::resolver::ResponseResolver;
use intervox_session::ConversationOrchestrator;
use intervox_speech::capability::Capability;
use intervox_speech::capture::CaptureController;
use intervox_speech::playback::PlaybackController;

use cli::CliArgs;

/// Print any bot messages and surface notices as they arrive.
async fn event_printer(orchestrator: Arc<ConversationOrchestrator>) {
    let mut events = orchestrator.subscribe();
    while let Ok(event) = events.recv().await {
        match event {
            SessionEvent::MessageAppended { id, sender: Sender::Bot } => {
                if let Some(message) = orchestrator.messages().iter().find(|m| m.id == id) {
                    println!("\nbot> {}\n", message.content);
                }
            }
            SessionEvent::MessageAppended { .. } => {}
            SessionEvent::SessionEnded => break,
            other => {
                println!("[notice: {}]", other.event_name());
            }
        }
    }
}

fn print_help() {
    println!("Commands: /handoff, /mute, /unmute, /lang <code>, /languages, /quit");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing. Priority: --log-level > RUST_LOG > "info".
    let filter = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Intervox v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = IntervoxConfig::load_or_default(&config_file);
    if let Some(endpoint) = args.endpoint {
        config.reply.endpoint_url = endpoint;
    }
    if args.muted {
        config.session.start_muted = true;
    }

    // Response resolution over the HTTP completion backend.
    let backend = HttpCompletionClient::with_timeout(
        &config.reply.endpoint_url,
        Duration::from_secs(config.reply.request_timeout_secs),
    );
    tracing::info!(endpoint = %backend.endpoint(), "Remote completion client ready");
    let resolver = ResponseResolver::new(Box::new(backend));

    // No platform speech services on a plain terminal.
    let capture = CaptureController::new(Capability::Unavailable);
    let playback =
        PlaybackController::new(Capability::Unavailable).with_voice(config.speech.rate, config.speech.pitch);

    let orchestrator = Arc::new(ConversationOrchestrator::start(
        config.session.clone(),
        resolver,
        capture,
        playback,
    ));

    if let Some(code) = args.language {
        match Language::by_code(&code) {
            Some(language) => orchestrator.set_language(language),
            None => tracing::warn!(code, "Unknown language code, keeping en-US"),
        }
    }

    // The welcome message was appended before we subscribed; print it directly.
    for message in orchestrator.messages() {
        println!("\nbot> {}\n", message.content);
    }
    print_help();

    let printer = tokio::spawn(event_printer(Arc::clone(&orchestrator)));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();

        match line.as_str() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => print_help(),
            "/handoff" => orchestrator.request_human_handoff(),
            "/mute" => orchestrator.set_muted(true),
            "/unmute" => orchestrator.set_muted(false),
            "/languages" => {
                for language in Language::catalog() {
                    println!("  {}  {}", language.code, language);
                }
            }
            cmd if cmd.starts_with("/lang ") => {
                let code = cmd.trim_start_matches("/lang ").trim();
                match Language::by_code(code) {
                    Some(language) => orchestrator.set_language(language),
                    None => println!("[notice: unknown language code {:?}]", code),
                }
            }
            text => {
                if let Err(e) = orchestrator.submit(text, false).await {
                    println!("[notice: {}]", e);
                }
            }
        }
    }

    orchestrator.teardown();
    let _ = printer.await;
    tracing::info!("Goodbye");
    Ok(())
}
