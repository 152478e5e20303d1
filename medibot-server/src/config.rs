//! Process configuration, read once from the environment at start-up.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

use medibot_rag::AnswerConfig;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_INDEX_NAME: &str = "medicalbot";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("must be 'text' or 'json', got '{other}'")),
        }
    }
}

/// Everything the service needs to start.
///
/// | variable              | required | default          |
/// |-----------------------|----------|------------------|
/// | `GEMINI_API_KEY`      | yes      |                  |
/// | `PINECONE_API_KEY`    | yes      |                  |
/// | `PORT`                | no       | `10000`          |
/// | `PINECONE_INDEX_NAME` | no       | `medicalbot`     |
/// | `PINECONE_INDEX_HOST` | no       | resolved by name |
/// | `PINECONE_NAMESPACE`  | no       | default namespace|
/// | `GEMINI_MODEL`        | no       | `gemini-1.5-pro` |
/// | `HF_TOKEN`            | no       |                  |
/// | `EMBEDDING_ENDPOINT`  | no       | Hugging Face router |
/// | `LOG_FORMAT`          | no       | `text`           |
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: String,
    pub pinecone_api_key: String,
    pub pinecone_index_name: String,
    pub pinecone_index_host: Option<String>,
    pub pinecone_namespace: Option<String>,
    pub hf_token: Option<String>,
    pub embedding_endpoint: Option<String>,
    pub answer: AnswerConfig,
    pub log_format: LogFormat,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &'static str| {
            get(key).ok_or(ConfigError::Misconfiguration { var: key, reason: "is not set".into() })
        };

        let gemini_api_key = require("GEMINI_API_KEY")?;
        let pinecone_api_key = require("PINECONE_API_KEY")?;

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Misconfiguration {
                var: "PORT",
                reason: format!("'{raw}' is not a valid port: {e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw
                .parse()
                .map_err(|reason| ConfigError::Misconfiguration { var: "LOG_FORMAT", reason })?,
            None => LogFormat::default(),
        };

        let mut answer = AnswerConfig::builder();
        if let Some(model) = get("GEMINI_MODEL") {
            answer = answer.model(model);
        }
        let answer = answer.build().map_err(|e| ConfigError::Misconfiguration {
            var: "GEMINI_MODEL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            port,
            gemini_api_key,
            pinecone_api_key,
            pinecone_index_name: get("PINECONE_INDEX_NAME")
                .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string()),
            pinecone_index_host: get("PINECONE_INDEX_HOST"),
            pinecone_namespace: get("PINECONE_NAMESPACE"),
            hf_token: get("HF_TOKEN"),
            embedding_endpoint: get("EMBEDDING_ENDPOINT"),
            answer,
            log_format,
        })
    }

    /// The listen address. The host is always all interfaces.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("gemini_api_key", &"<redacted>")
            .field("pinecone_api_key", &"<redacted>")
            .field("pinecone_index_name", &self.pinecone_index_name)
            .field("pinecone_index_host", &self.pinecone_index_host)
            .field("pinecone_namespace", &self.pinecone_namespace)
            .field("hf_token", &self.hf_token.as_ref().map(|_| "<redacted>"))
            .field("embedding_endpoint", &self.embedding_endpoint)
            .field("answer", &self.answer)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    const KEYS: [(&str, &str); 2] = [("GEMINI_API_KEY", "g-key"), ("PINECONE_API_KEY", "p-key")];

    #[test]
    fn defaults_apply_when_only_credentials_are_set() {
        let config = Config::from_lookup(lookup(&KEYS)).unwrap();
        assert_eq!(config.port, 10000);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:10000");
        assert_eq!(config.pinecone_index_name, "medicalbot");
        assert!(config.pinecone_index_host.is_none());
        assert!(config.hf_token.is_none());
        assert_eq!(config.answer, AnswerConfig::default());
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn missing_credentials_are_misconfiguration() {
        let err = Config::from_lookup(lookup(&[("PINECONE_API_KEY", "p")])).unwrap_err();
        assert!(
            matches!(err, ConfigError::Misconfiguration { var: "GEMINI_API_KEY", .. }),
            "{err}"
        );

        let err = Config::from_lookup(lookup(&[("GEMINI_API_KEY", "g"), ("PINECONE_API_KEY", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Misconfiguration { var: "PINECONE_API_KEY", .. }));
    }

    #[test]
    fn invalid_port_is_misconfiguration() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("PORT", "ten-thousand"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Misconfiguration { var: "PORT", .. }));
    }

    #[test]
    fn optional_overrides_are_read() {
        let mut pairs = KEYS.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("PINECONE_INDEX_HOST", "medicalbot-x.svc.pinecone.io"),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("HF_TOKEN", "hf_abc"),
            ("LOG_FORMAT", "JSON"),
        ]);
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.pinecone_index_host.as_deref(), Some("medicalbot-x.svc.pinecone.io"));
        assert_eq!(config.answer.model, "gemini-2.5-flash");
        assert_eq!(config.hf_token.as_deref(), Some("hf_abc"));
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn debug_output_hides_secrets() {
        let config = Config::from_lookup(lookup(&KEYS)).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("g-key"));
        assert!(!rendered.contains("p-key"));
    }
}
