//! Configuration management for interaction-agent

#[path = "config_tests.rs"]
mod config_tests;

use std::fs;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use interaction_nats::NatsConfig;
use interaction_waiters::DEFAULT_STALE_NOTICE;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Source of environment variables. Tests substitute an in-memory map.
pub trait ReadEnv {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment
pub struct SystemEnv;

impl ReadEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Complete agent configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub nats: NatsConfig,
    #[serde(default)]
    pub waiters: WaitersConfig,
}

/// Registry housekeeping and wait defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaitersConfig {
    /// Seconds between reaper sweeps
    #[serde(default = "default_reaper_interval_secs")]
    pub reaper_interval_secs: u64,
    /// Deadline for prompts that do not carry their own
    #[serde(default = "default_timeout_secs")]
    pub default_timeout_secs: u64,
    /// Shown to users who activate a control nobody is waiting on
    #[serde(default = "default_notice_text")]
    pub notice_text: String,
}

fn default_reaper_interval_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    180
}

fn default_notice_text() -> String {
    DEFAULT_STALE_NOTICE.to_string()
}

impl Default for WaitersConfig {
    fn default() -> Self {
        Self {
            reaper_interval_secs: default_reaper_interval_secs(),
            default_timeout_secs: default_timeout_secs(),
            notice_text: default_notice_text(),
        }
    }
}

impl WaitersConfig {
    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_secs(self.default_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(&SystemEnv)
    }

    pub fn from_env_with(env: &impl ReadEnv) -> Result<Self> {
        let nats_url = env
            .var("NATS_URL")
            .unwrap_or_else(|| "localhost:4222".to_string());
        let prefix = env
            .var("INTERACTION_PREFIX")
            .unwrap_or_else(|| "prod".to_string());

        let mut nats = NatsConfig::from_url(nats_url, prefix);
        if let Some(creds) = env.var("NATS_CREDS") {
            nats = nats.with_credentials(creds);
        }
        if let (Some(user), Some(password)) = (env.var("NATS_USER"), env.var("NATS_PASSWORD")) {
            nats = nats.with_auth(user, password);
        }

        let waiters = WaitersConfig {
            reaper_interval_secs: parse_secs(
                env,
                "REAPER_INTERVAL_SECS",
                default_reaper_interval_secs(),
            ),
            default_timeout_secs: parse_secs(env, "DEFAULT_TIMEOUT_SECS", default_timeout_secs()),
            notice_text: env
                .var("STALE_NOTICE_TEXT")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(default_notice_text),
        };

        Ok(Config { nats, waiters })
    }

    /// Checks the settings the process cannot run with
    pub fn validate(&self) -> Result<()> {
        self.nats
            .validate()
            .context("Invalid NATS configuration")?;
        if self.waiters.reaper_interval_secs == 0 {
            bail!("waiters.reaper_interval_secs must be greater than zero");
        }
        if self.waiters.default_timeout_secs == 0 {
            bail!("waiters.default_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

fn parse_secs(env: &impl ReadEnv, key: &str, default: u64) -> u64 {
    match env.var(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
    }
}
