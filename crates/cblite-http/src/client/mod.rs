//! Request pipeline for the Couchbase Lite REST API.

mod config;
mod fetch;
mod request;

pub use config::{ClientConfig, Credentials};
pub use fetch::CbliteClient;
pub use request::RequestOptions;
