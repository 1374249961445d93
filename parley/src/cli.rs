//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CONFIG_PATH: &str = "appsettings.json";

/// Chat with an OpenAI-compatible model from the terminal.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "parley", version, about, long_about = None)]
pub struct Cli {
    /// Settings file with an `XAI` section
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Model to use; skips the selection prompt
    #[arg(short, long)]
    pub model: Option<String>,

    /// API key for the endpoint
    #[arg(long, env = "XAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Full chat/completions URL
    #[arg(long)]
    pub api_url: Option<String>,

    /// Upper bound on generated tokens per reply
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature (0.0 to 2.0)
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Request timeout in seconds; 0 disables it
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}
