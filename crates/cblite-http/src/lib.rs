//! Thin async client for the Couchbase Lite REST listener: database and
//! document CRUD, view queries, replication, and a long-poll change feed.

pub mod changes;
pub mod client;
pub mod connector;
pub mod database;
pub mod error;
pub mod types;

pub use changes::{ChangesFeed, ChangesSubscription};
pub use client::{CbliteClient, ClientConfig, Credentials, RequestOptions};
pub use connector::{Connector, EngineDiscovery, EnvDiscovery, FixedUrl, CBLITE_URL_VAR};
pub use database::Database;
pub use error::{CbliteError, Result};
pub use types::{ChangeRev, ChangeRow, ChangesResponse, DesignDocument, ViewDefinition};
