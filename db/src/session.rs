//! Session abstraction over a live database connection.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::ConnectionConfig;
use error::Result;

/// Fixed query issued by the liveness check.
pub const LIVENESS_QUERY: &str = "SELECT DB_NAME() AS CurrentDB, GETDATE() AS CurrentTime";

/// Result of the liveness query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LivenessReport {
    /// Name of the database the session is attached to
    pub database: String,
    /// Server clock at the time of the query
    pub server_time: NaiveDateTime,
}

/// An open session. Closing consumes it, so a closed session cannot be reused.
#[allow(async_fn_in_trait)]
pub trait Session: Send {
    /// Run [`LIVENESS_QUERY`] and return its single row.
    async fn current_database_and_time(&mut self) -> Result<LivenessReport>;

    /// Release the session.
    async fn close(self) -> Result<()>;
}

/// Opens sessions against the backend described by a [`ConnectionConfig`].
#[allow(async_fn_in_trait)]
pub trait Connector: Send + Sync {
    type Session: Session;

    /// Open a new session. No retries.
    async fn connect(&self, config: &ConnectionConfig) -> Result<Self::Session>;
}
