//! SQL Server connection provider for the Bushfire Analysis database.
//!
//! This crate hands out direct connections, pooled engines for bulk reads
//! and a one-shot liveness check, all built from an injected
//! [`ConnectionConfig`].

mod config;
mod connection;
mod engine;
mod frame;
mod provider;
mod session;

pub use config::{env, ConnectionConfig, URL_SCHEME};
pub use connection::{Connection, TdsClient, TdsConnector};
pub use engine::Engine;
pub use frame::{Frame, Value};
pub use provider::ConnectionProvider;
pub use session::{Connector, LivenessReport, Session, LIVENESS_QUERY};

pub use error::{DatabaseError, Result};

// Re-export driver crates for convenience
pub use {bb8, tiberius};
