//! CLI argument definitions for the Intervox application.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Intervox — an interview-candidate assistant you can chat with.
#[derive(Parser, Debug)]
#[command(name = "intervox", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Remote completion endpoint URL.
    #[arg(long = "endpoint")]
    pub endpoint: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Start with reply playback muted.
    #[arg(long = "muted")]
    pub muted: bool,

    /// Initial language code (e.g. en-US, de-DE).
    #[arg(long = "language")]
    pub language: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > INTERVOX_CONFIG env var > ~/.intervox/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("INTERVOX_CONFIG") {
            return PathBuf::from(p);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".intervox").join("config.toml");
        }
        PathBuf::from("config.toml")
    }
}
