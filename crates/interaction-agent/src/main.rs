//! Interaction Agent
//!
//! Owns the waiter registry for component interactions. Activations published
//! by the chat bot are dispatched to pending waiters, and other agents can ask
//! it to show a layout and wait for the answer.

mod config;
mod health;
mod listener;
mod prompt;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use interaction_nats::{connect, MessagePublisher, MessageSubscriber};
use interaction_waiters::{
    spawn_reaper, ComponentDispatcher, InteractionWaiter, NatsLayoutSurface, WaiterRegistry,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::health::AppState;

/// Interaction Agent CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/interaction-agent.toml")]
    config: String,

    /// NATS URL (overrides config file)
    #[arg(long, env = "NATS_URL")]
    nats_url: Option<String>,

    /// NATS prefix (overrides config file)
    #[arg(long, env = "INTERACTION_PREFIX")]
    prefix: Option<String>,

    /// Health check server port
    #[arg(long, env = "HEALTH_CHECK_PORT", default_value = "3002")]
    health_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "interaction_agent=debug,interaction_waiters=debug,interaction_nats=debug,info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interaction Agent");

    let args = Args::parse();

    let mut config = if std::path::Path::new(&args.config).exists() {
        info!("Loading config from file: {}", args.config);
        Config::from_file(&args.config)?
    } else {
        info!("Config file not found, loading from environment");
        Config::from_env()?
    };

    if let Some(nats_url) = args.nats_url {
        config.nats.servers = nats_url
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(prefix) = args.prefix {
        config.nats.prefix = prefix;
    }
    config.validate()?;

    info!("NATS prefix: {}", config.nats.prefix);

    let nats_client = connect(&config.nats).await?;
    info!("Connected to NATS");

    let prefix = config.nats.prefix.clone();
    let registry = Arc::new(WaiterRegistry::new());
    let reaper = spawn_reaper(Arc::clone(&registry), config.waiters.reaper_interval());

    let publisher = MessagePublisher::new(nats_client.clone(), prefix.clone());
    let surface = NatsLayoutSurface::new(publisher.clone());
    let dispatcher = ComponentDispatcher::new(Arc::clone(&registry), surface.clone())
        .with_notice(config.waiters.notice_text.clone());
    let waiter = Arc::new(
        InteractionWaiter::new(Arc::clone(&registry), surface)
            .with_default_timeout(config.waiters.default_timeout()),
    );

    let health_state = AppState::new(Arc::clone(&registry));
    let health_port = args.health_port;
    tokio::spawn(async move {
        if let Err(e) = health::start_health_server(health_state, health_port).await {
            error!("Health server error: {}", e);
        }
    });

    let mut activations = tokio::spawn(listener::run(
        MessageSubscriber::new(nats_client.clone(), prefix.clone()),
        dispatcher,
    ));
    let prompts = tokio::spawn(prompt::run(
        MessageSubscriber::new(nats_client, prefix),
        waiter,
        publisher,
    ));

    tokio::select! {
        signal = shutdown_signal() => {
            signal?;
            info!("Shutdown signal received");
        }
        finished = &mut activations => {
            match finished {
                Ok(Ok(())) => info!("Activation listener finished"),
                Ok(Err(e)) => error!("Activation listener error: {}", e),
                Err(e) => error!("Activation listener task failed: {}", e),
            }
        }
    }

    activations.abort();
    prompts.abort();
    reaper.stop().await;

    info!("Interaction Agent stopped");
    Ok(())
}

/// Resolves on SIGTERM or Ctrl+C.
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }
    Ok(())
}
