// mockctl-api: Async Rust client for the mock server admin REST API

pub mod client;
pub mod error;
pub mod models;
mod reference;
mod service_actions;
mod services;
pub mod transport;

pub use client::{ALL_GROUPS, AdminClient};
pub use error::Error;
pub use models::{
    DEFAULT_TIMEOUT_MS, Environment, Flag, FlagEncoding, MockGroup, RecordId, Service,
    ServiceAction,
};
pub use transport::{TlsMode, TransportConfig};
