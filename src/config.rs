use clap::Parser;
use tracing::Level;

use crate::quota::DEFAULT_DAILY_LIMIT;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "translation-gateway")]
#[command(about = "Claude-backed gateway for the translation trainer, with a daily problem quota")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Interface to bind
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    // Problems each identity may generate per calendar day
    #[arg(long, default_value_t = DEFAULT_DAILY_LIMIT)]
    pub daily_limit: u32,

    // Identity every request is counted under unless --trust-user-header is set
    #[arg(long, default_value = "anonymous")]
    pub default_user: String,

    // Count quota per x-user-id header. Only safe behind a proxy that sets it.
    #[arg(long, default_value_t = false)]
    pub trust_user_header: bool,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: String,

    #[arg(long, env = "CLAUDE_MODEL", default_value = crate::claude::DEFAULT_MODEL)]
    pub model: String,

    // Evaluation cache TTL in seconds
    #[arg(short, long, default_value_t = 3600)]
    pub cache_ttl: u64,

    // Capacity of the tutor job queue
    #[arg(long, default_value_t = 100)]
    pub queue_size: usize,

    // Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    pub fn tracing_level(&self) -> Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}
