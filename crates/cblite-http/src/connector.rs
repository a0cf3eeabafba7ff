//! Discovery of the local Couchbase Lite listener and database opening.

use crate::client::{CbliteClient, ClientConfig};
use crate::database::Database;
use crate::error::{CbliteError, Result};
use async_trait::async_trait;
use url::Url;

/// Environment variable consulted by [`EnvDiscovery`].
pub const CBLITE_URL_VAR: &str = "CBLITE_URL";

/// Reports the base URL of the locally installed Couchbase Lite listener.
///
/// Absence of the host integration is a detectable precondition failure and
/// maps to [`CbliteError::EngineNotInstalled`].
#[async_trait]
pub trait EngineDiscovery: Send + Sync {
    async fn base_url(&self) -> Result<Url>;
}

/// Resolves the listener URL from the `CBLITE_URL` environment variable.
pub struct EnvDiscovery;

#[async_trait]
impl EngineDiscovery for EnvDiscovery {
    async fn base_url(&self) -> Result<Url> {
        let raw = std::env::var(CBLITE_URL_VAR).map_err(|_| CbliteError::EngineNotInstalled)?;
        Url::parse(&raw).map_err(|e| CbliteError::Config(e.to_string()))
    }
}

/// A listener URL known ahead of time, for embedders that resolve it
/// themselves.
pub struct FixedUrl(pub Url);

impl FixedUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(FixedUrl(
            Url::parse(raw).map_err(|e| CbliteError::Config(e.to_string()))?,
        ))
    }
}

#[async_trait]
impl EngineDiscovery for FixedUrl {
    async fn base_url(&self) -> Result<Url> {
        Ok(self.0.clone())
    }
}

/// Opens (or creates) a named database behind the discovered listener.
pub struct Connector<D = EnvDiscovery> {
    discovery: D,
    config: ClientConfig,
}

impl Connector<EnvDiscovery> {
    pub fn new() -> Self {
        Connector {
            discovery: EnvDiscovery,
            config: ClientConfig::default(),
        }
    }
}

impl Default for Connector<EnvDiscovery> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: EngineDiscovery> Connector<D> {
    pub fn with_discovery(discovery: D) -> Self {
        Connector {
            discovery,
            config: ClientConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Open `database_name`, creating it when the listener reports it
    /// missing. Any other fetch failure propagates to the caller.
    pub async fn open(&self, database_name: &str) -> Result<Database> {
        let base = self.discovery.base_url().await?;
        let client = CbliteClient::with_config(self.config.clone())?;
        let database = Database::new(base.as_str(), database_name, client)?;
        match database.get_database().await {
            Ok(_) => Ok(database),
            Err(err) if err.is_not_found() => {
                database.create_database().await?;
                Ok(database)
            }
            Err(err) => Err(err),
        }
    }
}
