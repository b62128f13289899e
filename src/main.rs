use std::net::SocketAddr;
use std::sync::Arc;

use bitbot::config::AppConfig;
use bitbot::domain::bits::{self, Ledger, Roster};
use bitbot::domain::dispatch::{EventRouter, RouterSettings};
use bitbot::domain::slack::{SlackApi, SlackClient, SlackHandle};
use bitbot::utils::logging::init_logging;
use bitbot::{app, shutdown, AppState};

#[tokio::main]
async fn main() {
    // 1. Environment
    dotenvy::dotenv().ok();

    // 2. Logging (the guard flushes the file writer on exit)
    let _log_guard = init_logging();

    // 3. Configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // 4. Resolve the bot's own user id
    let client = SlackClient::new(config.slack_bot_token.clone(), config.slack_api_base.clone());
    let bot_user_id = match client.auth_test().await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Slack auth.test failed, check SLACK_BOT_TOKEN");
            std::process::exit(1);
        }
    };
    tracing::info!(bot_user_id = %bot_user_id, "Authenticated with Slack");
    let slack: SlackHandle = Arc::new(client);

    // 5. Actions and router
    let ledger = Arc::new(Ledger::new());
    let actions = bits::action_table(ledger, Roster::new(config.teams.clone()));
    let router = EventRouter::new(
        slack,
        actions,
        RouterSettings {
            bot_user_id,
            audit_channel: config.bot_logs_channel.clone(),
            allowed_channels: config.allowed_channels.clone(),
        },
    );

    let port = config.server_port;
    let app = app(AppState::new(config, router));

    // 6. Serve
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "Failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }
}
