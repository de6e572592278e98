use std::{net::SocketAddr, sync::Arc};

use autoaid_gateway::{
    chat::{
        telegram::{run_polling, TelegramClient},
        ChatBot,
    },
    config::GatewayConfig,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,autoaid_gateway=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env()?;
    let state = autoaid_gateway::build_state(&config)?;

    if state.service.status().await.is_ok() {
        info!(model = %config.backend.model, "generation backend reachable");
    } else {
        warn!(
            base_url = %config.backend.base_url,
            "generation backend unreachable, requests will fail until it comes up"
        );
    }

    if let Some(telegram) = &config.telegram {
        let client = Arc::new(TelegramClient::new(telegram)?);
        let bot = Arc::new(ChatBot::new(client, state.service.clone(), config.delivery));
        tokio::spawn(run_polling(bot));
    } else {
        warn!("BOT_TOKEN not set, chat transport disabled");
    }

    let app = autoaid_gateway::build_app(state);
    let addr = SocketAddr::new(config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(error = %error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
