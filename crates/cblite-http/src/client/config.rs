//! Configuration for the Couchbase Lite REST client.

/// Basic-auth credentials attached to requests that ask for them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Configuration for the Couchbase Lite REST client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Delay between a completed change-feed poll and the next one, in milliseconds.
    pub poll_delay_ms: u64,
    /// Credentials attached when a request sets the credentials flag.
    pub credentials: Option<Credentials>,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Enable request logging.
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            poll_delay_ms: 10,
            credentials: None,
            user_agent: concat!("cblite-http/", env!("CARGO_PKG_VERSION")).to_string(),
            enable_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.poll_delay_ms, 10);
        assert_eq!(config.credentials, None);
        assert!(config.user_agent.starts_with("cblite-http/"));
        assert!(!config.enable_logging);
    }

    #[test]
    fn test_partial_override() {
        let config = ClientConfig {
            poll_delay_ms: 250,
            ..Default::default()
        };
        assert_eq!(config.poll_delay_ms, 250);
        assert_eq!(config.credentials, None);
    }

    #[test]
    fn test_clone() {
        let config = ClientConfig {
            credentials: Some(Credentials::new("admin", "secret")),
            ..Default::default()
        };
        let cloned = config.clone();
        assert_eq!(config, cloned);
    }
}
