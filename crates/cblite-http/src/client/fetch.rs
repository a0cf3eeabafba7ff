//! The shared request pipeline: one HTTP request in, one parsed JSON body out.

use crate::client::config::ClientConfig;
use crate::client::request::RequestOptions;
use crate::error::{CbliteError, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Executes exactly one HTTP request per call against the Couchbase Lite
/// listener. Cheap to clone; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct CbliteClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl CbliteClient {
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        // No global request timeout: change-feed long polls must be able to
        // block until the server has something to report.
        let client = reqwest::Client::builder()
            .http1_only()
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CbliteError::Config(e.to_string()))?;
        Ok(CbliteClient {
            client,
            config: Arc::new(config),
        })
    }

    /// Wrap an externally configured `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        CbliteClient {
            client,
            config: Arc::new(ClientConfig::default()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue one request. Status 200/201 resolves with the parsed JSON body;
    /// any other status fails with the parsed JSON error body. Exactly one
    /// attempt, no retry, no timeout.
    pub async fn execute(&self, url: &str, options: RequestOptions) -> Result<Value> {
        let mut url = url.to_string();
        let query = options.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }

        if self.config.enable_logging {
            tracing::debug!("[CbliteHTTP-Out] {} {}", options.method, url);
        }

        let mut builder = self.client.request(options.method.clone(), &url);
        if options.json {
            builder = builder.header(reqwest::header::CONTENT_TYPE, "application/json");
        }
        if options.with_credentials {
            if let Some(credentials) = &self.config.credentials {
                builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
            }
        }
        if let Some(body) = &options.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CbliteError::Http(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CbliteError::Http(e.to_string()))?;

        if status == 200 || status == 201 {
            if bytes.is_empty() {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            if self.config.enable_logging {
                tracing::warn!("[CbliteHTTP] {} {} -> {}", options.method, url, status);
            }
            // Error bodies are normally JSON; keep the raw text when not.
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            Err(CbliteError::Server { status, body })
        }
    }

    /// `execute` with the resolved body deserialized into `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        url: &str,
        options: RequestOptions,
    ) -> Result<T> {
        let value = self.execute(url, options).await?;
        Ok(serde_json::from_value(value)?)
    }
}
