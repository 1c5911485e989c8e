//! Provider configuration
//!
//! Loaded from the `provider` block of the configuration file, with
//! `FORTIMANAGER_*` environment variables taking precedence.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const ENV_HOSTNAME: &str = "FORTIMANAGER_ACCESS_HOSTNAME";
pub const ENV_USERNAME: &str = "FORTIMANAGER_ACCESS_USERNAME";
pub const ENV_PASSWORD: &str = "FORTIMANAGER_ACCESS_PASSWORD";
pub const ENV_TOKEN: &str = "FORTIMANAGER_ACCESS_TOKEN";
pub const ENV_INSECURE: &str = "FORTIMANAGER_INSECURE";
pub const ENV_TIMEOUT: &str = "FORTIMANAGER_TIMEOUT";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FortiManager hostname is not set (provider.hostname or FORTIMANAGER_ACCESS_HOSTNAME)")]
    MissingHostname,

    #[error("No credentials: set a token, or both username and password")]
    MissingCredentials,

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// How the client authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// API token sent as a bearer header
    Token(String),
    /// Session login with user and password
    Password { username: String, password: String },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(***)"),
            Credentials::Password { username, .. } => {
                write!(f, "Password {{ username: {:?}, password: *** }}", username)
            }
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Host name or address, optionally with scheme and port
    pub hostname: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    /// Skip TLS certificate verification (self-signed appliances)
    pub insecure: bool,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            hostname: String::new(),
            username: None,
            password: None,
            token: None,
            insecure: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("insecure", &self.insecure)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ProviderConfig {
    /// Build a configuration purely from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Apply `FORTIMANAGER_*` environment variables on top of this configuration
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup(ENV_HOSTNAME) {
            self.hostname = v;
        }
        if let Some(v) = lookup(ENV_USERNAME) {
            self.username = Some(v);
        }
        if let Some(v) = lookup(ENV_PASSWORD) {
            self.password = Some(v);
        }
        if let Some(v) = lookup(ENV_TOKEN) {
            self.token = Some(v);
        }
        if let Some(v) = lookup(ENV_INSECURE) {
            self.insecure = parse_bool(ENV_INSECURE, &v)?;
        }
        if let Some(v) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT.to_string(),
                value: v.clone(),
            })?;
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hostname.trim().is_empty() {
            return Err(ConfigError::MissingHostname);
        }
        self.credentials().map(|_| ())
    }

    /// Token wins over username/password when both are configured
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        if let Some(token) = self.token.as_ref().filter(|t| !t.is_empty()) {
            return Ok(Credentials::Token(token.clone()));
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) if !username.is_empty() => {
                Ok(Credentials::Password {
                    username: username.clone(),
                    password: password.clone(),
                })
            }
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    /// JSON-RPC endpoint URL
    pub fn endpoint(&self) -> String {
        let host = self.hostname.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            format!("{}/jsonrpc", host)
        } else {
            format!("https://{}/jsonrpc", host)
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_take_precedence() {
        let config = ProviderConfig {
            hostname: "fmg.lab".to_string(),
            ..Default::default()
        }
        .with_overrides(lookup(&[
            (ENV_HOSTNAME, "10.0.0.5"),
            (ENV_TOKEN, "abc"),
            (ENV_INSECURE, "true"),
            (ENV_TIMEOUT, "15"),
        ]))
        .unwrap();

        assert_eq!(config.hostname, "10.0.0.5");
        assert!(config.insecure);
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(
            config.credentials().unwrap(),
            Credentials::Token("abc".to_string())
        );
    }

    #[test]
    fn invalid_override_is_rejected() {
        let result = ProviderConfig::default().with_overrides(lookup(&[(ENV_INSECURE, "perhaps")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn validate_requires_hostname_and_credentials() {
        let config = ProviderConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingHostname)));

        let config = ProviderConfig {
            hostname: "fmg.lab".to_string(),
            username: Some("admin".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredentials)
        ));

        let config = ProviderConfig {
            password: Some("secret".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn endpoint_adds_scheme_when_missing() {
        let mut config = ProviderConfig {
            hostname: "fmg.lab".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint(), "https://fmg.lab/jsonrpc");

        config.hostname = "http://127.0.0.1:8080/".to_string();
        assert_eq!(config.endpoint(), "http://127.0.0.1:8080/jsonrpc");
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = ProviderConfig {
            hostname: "fmg.lab".to_string(),
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"hostname": "fmg.lab", "token": "t"}"#).unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!config.insecure);
    }
}
