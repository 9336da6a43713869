use crate::{env_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;

pub const DEFAULT_PORT: u16 = 3000;

/// Bind address for the HTTP listener
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`, as accepted by `TcpListener::bind`
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// `HOST` defaults to all interfaces, `PORT` to [`DEFAULT_PORT`].
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default("PORT", &DEFAULT_PORT.to_string())
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self { host, port })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config, ServerConfig::default());
            assert_eq!(config.address(), "0.0.0.0:3000");
        });
    }

    #[test]
    fn test_server_config_overrides() {
        temp_env::with_vars(
            [("HOST", Some("127.0.0.1")), ("PORT", Some("8081"))],
            || {
                let config = ServerConfig::from_env().unwrap();
                assert_eq!(config.address(), "127.0.0.1:8081");
            },
        );
    }

    #[test]
    fn test_server_config_rejects_bad_port() {
        for bad in ["not_a_number", "99999"] {
            temp_env::with_var("PORT", Some(bad), || {
                let err = ServerConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("PORT"));
            });
        }
    }
}
