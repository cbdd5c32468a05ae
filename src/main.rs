use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use translation_gateway::app;
use translation_gateway::claude::ClaudeApiClient;
use translation_gateway::config::Args;
use translation_gateway::quota::DailyQuotaTracker;
use translation_gateway::state::{AppState, IdentityPolicy};
use translation_gateway::tutor::ClaudeTutor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // parse cli arguments
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.tracing_level())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client = ClaudeApiClient::new(args.anthropic_api_key.clone(), Some(args.model.clone()))?;
    info!("Using Claude model {}", client.model());
    let tutor = Arc::new(ClaudeTutor::new(client));

    // quota lives in process memory; a restart resets every count
    let quota = DailyQuotaTracker::in_memory(args.daily_limit);

    let state = AppState::spawn(
        quota,
        tutor,
        IdentityPolicy {
            default_user: args.default_user.clone(),
            trust_user_header: args.trust_user_header,
        },
        Duration::from_secs(args.cache_ttl),
        args.queue_size,
    );

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gateway running on http://{}", addr);
    info!(
        "Daily limit: {} problems per identity (default identity: {}, trust x-user-id: {})",
        args.daily_limit, args.default_user, args.trust_user_header
    );
    info!("Evaluation cache TTL: {} seconds", args.cache_ttl);

    axum::serve(listener, app(state)).await?;
    Ok(())
}
