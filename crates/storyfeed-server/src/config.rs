use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ServerError, ServerResult};
use crate::state::web_origin;

/// Server settings, loadable from TOML. Missing keys take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Origin this deployment serves, e.g. `https://app.example.io`. Only the
    /// scheme, host and port are used. When unset it is derived per request
    /// from forwarding headers.
    pub app_origin: Option<String>,
    /// Base URL of the naming service.
    pub naming_url: String,
    /// Timeout for each outbound HTTP request.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            app_origin: None,
            naming_url: "https://core.blockstack.org".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if let Some(origin) = &self.app_origin {
            web_origin(origin).map_err(|e| {
                ServerError::Config(format!("app_origin {origin:?} is not an http(s) origin: {e}"))
            })?;
        }
        let naming = Url::parse(&self.naming_url).map_err(|e| {
            ServerError::Config(format!("naming_url {:?}: {e}", self.naming_url))
        })?;
        if !matches!(naming.scheme(), "http" | "https") {
            return Err(ServerError::Config(format!(
                "naming_url must be http(s), got {:?}",
                self.naming_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ServerError::Config("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.naming_url, "https://core.blockstack.org");
        assert_eq!(c.request_timeout(), Duration::from_secs(30));
        assert!(c.app_origin.is_none());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            app_origin = "https://app.example.io"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.app_origin.as_deref(), Some("https://app.example.io"));
        assert_eq!(c.request_timeout_secs, 30);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ServerConfig::from_toml_str("bind_addr = \"nope\"").is_err());
        assert!(ServerConfig::from_toml_str("app_origin = \"ftp://x\"").is_err());
        assert!(ServerConfig::from_toml_str("request_timeout_secs = 0").is_err());
        assert!(ServerConfig::from_toml_str("app_origin = \"app.io\"").is_err());
        assert!(ServerConfig::from_toml_str("naming_url = \"\"").is_err());
        assert!(ServerConfig::from_toml_str("naming_url = \"core.example\"").is_err());
    }

    #[test]
    fn origin_with_path_is_accepted() {
        let c = ServerConfig::from_toml_str("app_origin = \"https://app.io/blog\"").unwrap();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = ServerConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
