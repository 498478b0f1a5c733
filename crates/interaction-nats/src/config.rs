//! NATS connection configuration for the interaction agent

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// NATS connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NatsConfig {
    /// NATS server URLs (comma-separated when loaded from env)
    pub servers: Vec<String>,
    /// Subject prefix (e.g., "prod", "dev"); one subject token
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

fn default_prefix() -> String {
    "prod".to_string()
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self::new(vec!["localhost:4222".to_string()], default_prefix())
    }
}

impl NatsConfig {
    pub fn new(servers: Vec<String>, prefix: impl Into<String>) -> Self {
        Self {
            servers,
            prefix: prefix.into(),
            credentials_file: None,
            username: None,
            password: None,
        }
    }

    /// Parse servers from a comma-separated URL string
    pub fn from_url(url: impl AsRef<str>, prefix: impl Into<String>) -> Self {
        let servers = url
            .as_ref()
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect();
        Self::new(servers, prefix)
    }

    pub fn with_credentials(mut self, file: impl Into<String>) -> Self {
        self.credentials_file = Some(file.into());
        self
    }

    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Rejects configs that would produce unusable subjects or connect nowhere.
    pub fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            return Err(Error::Config("at least one NATS server is required".into()));
        }
        if self.prefix.is_empty() {
            return Err(Error::Config("prefix must not be empty".into()));
        }
        if let Some(ch) = self
            .prefix
            .chars()
            .find(|c| matches!(c, '.' | '*' | '>') || c.is_whitespace())
        {
            return Err(Error::Config(format!(
                "prefix contains invalid character: {:?}",
                ch
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_localhost() {
        let cfg = NatsConfig::default();
        assert_eq!(cfg.servers, vec!["localhost:4222"]);
        assert_eq!(cfg.prefix, "prod");
        assert!(cfg.credentials_file.is_none());
    }

    #[test]
    fn test_from_url_multiple_trims_and_skips_empty() {
        let cfg = NatsConfig::from_url("n1:4222 , n2:4222,,", "prod");
        assert_eq!(cfg.servers, vec!["n1:4222", "n2:4222"]);
    }

    #[test]
    fn test_with_auth() {
        let cfg = NatsConfig::from_url("localhost:4222", "test").with_auth("alice", "secret");
        assert_eq!(cfg.username.as_deref(), Some("alice"));
        assert_eq!(cfg.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_validate_accepts_default() {
        assert!(NatsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wildcard_prefix() {
        let cfg = NatsConfig::from_url("localhost:4222", "prod.*");
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("invalid character"));
    }

    #[test]
    fn test_validate_rejects_no_servers() {
        let cfg = NatsConfig::from_url("", "prod");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_default_prefix_on_deserialization() {
        let json = r#"{"servers":["localhost:4222"]}"#;
        let cfg: NatsConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.prefix, "prod");
    }

    #[test]
    fn test_optional_fields_omitted_in_json() {
        let json = serde_json::to_string(&NatsConfig::default()).unwrap();
        assert!(!json.contains("credentials_file"));
        assert!(!json.contains("password"));
    }
}
