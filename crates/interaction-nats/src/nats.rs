//! NATS connection for the interaction agent.
//!
//! The agent stays up while NATS is away: the initial connect retries and
//! reconnects are unbounded. Waiters live in process memory, so a broker
//! outage only delays activations; it never drops a pending wait.

use async_nats::{Client, ConnectOptions, Event};
use tracing::{debug, error, info, warn};

use crate::config::NatsConfig;
use crate::error::{Error, Result};

/// Client name reported to the server
pub const CLIENT_NAME: &str = "interaction-agent";

/// Builds connect options from `config`, loading credentials if configured.
pub async fn connect_options(config: &NatsConfig) -> Result<ConnectOptions> {
    let opts = ConnectOptions::new().name(CLIENT_NAME);

    let opts = match (&config.credentials_file, &config.username, &config.password) {
        (Some(creds_file), _, _) => opts.credentials_file(creds_file).await.map_err(|e| {
            Error::Connection(format!(
                "Failed to load credentials from {}: {}",
                creds_file, e
            ))
        })?,
        (None, Some(username), Some(password)) => {
            opts.user_and_password(username.clone(), password.clone())
        }
        (None, Some(username), None) => {
            warn!(username = %username, "NATS username set without password; connecting anonymously");
            opts
        }
        _ => opts,
    };

    let prefix = config.prefix.clone();
    Ok(opts
        .event_callback(move |event| {
            let prefix = prefix.clone();
            async move { log_event(&prefix, &event) }
        })
        .retry_on_initial_connect()
        .max_reconnects(None))
}

fn log_event(prefix: &str, event: &Event) {
    match event {
        Event::Connected => info!(prefix, "NATS connected; component activations flowing"),
        Event::Disconnected => warn!(
            prefix,
            "NATS disconnected; activations and prompts pause until reconnect"
        ),
        Event::LameDuckMode => warn!(prefix, "NATS server entering lame duck mode"),
        Event::SlowConsumer(sid) => warn!(
            prefix,
            sid, "Slow consumer; component activations may be dropped by the server"
        ),
        Event::ServerError(e) => error!(prefix, "NATS server error: {}", e),
        Event::ClientError(e) => warn!(prefix, "NATS client error: {}", e),
        other => debug!(prefix, "NATS event: {}", other),
    }
}

/// Connects to the configured servers after validating `config`.
pub async fn connect(config: &NatsConfig) -> Result<Client> {
    config.validate()?;
    info!(
        servers = ?config.servers,
        prefix = %config.prefix,
        "Connecting interaction agent to NATS"
    );

    let servers: Vec<&str> = config.servers.iter().map(String::as_str).collect();
    let client = connect_options(config)
        .await?
        .connect(servers)
        .await
        .map_err(|e| Error::Connection(format!("Failed to connect to NATS: {}", e)))?;

    Ok(client)
}
