//! Pooled engine for bulk tabular reads.

use bb8::{Pool, PooledConnection, State};
use bb8_tiberius::ConnectionManager;

use crate::config::ConnectionConfig;
use crate::frame::{Frame, Value};
use error::{DatabaseError, Result};

/// Connection pool plus the URL it was built from.
///
/// Building an engine does not touch the network; connections are opened on
/// first checkout and dropped with the engine.
#[derive(Clone)]
pub struct Engine {
    pool: Pool<ConnectionManager>,
    url: String,
    redacted_url: String,
    database: String,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("url", &self.redacted_url)
            .field("state", &self.pool.state())
            .finish()
    }
}

impl Engine {
    /// Create a new engine from the given configuration.
    pub async fn new(config: &ConnectionConfig) -> Result<Self> {
        // bb8 panics on an empty pool, min above max or a zero timeout.
        config
            .validate()
            .map_err(|e| DatabaseError::EngineFailed(e.detail()))?;

        tracing::info!("Creating database engine: {}", config.redacted_url());

        let manager = ConnectionManager::new(config.tiberius_config());
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle((config.min_connections > 0).then_some(config.min_connections))
            .connection_timeout(config.connect_timeout())
            .build(manager)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database engine: {}", e);
                DatabaseError::EngineFailed(e.to_string())
            })?;

        tracing::info!("Database engine created successfully");
        Ok(Self {
            pool,
            url: config.connection_url(),
            redacted_url: config.redacted_url(),
            database: config.database.clone(),
        })
    }

    /// Connection string the engine was built from.
    pub fn connection_url(&self) -> &str {
        &self.url
    }

    /// Connection string with the password masked.
    pub fn redacted_url(&self) -> &str {
        &self.redacted_url
    }

    /// Name of the database the engine reads from.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Current pool occupancy.
    pub fn state(&self) -> State {
        self.pool.state()
    }

    /// Check out a pooled connection.
    pub async fn get(&self) -> Result<PooledConnection<'_, ConnectionManager>> {
        self.pool.get().await.map_err(|e| {
            tracing::error!("Failed to check out connection: {}", e);
            DatabaseError::ConnectionFailed(e.to_string())
        })
    }

    /// Run a query and load its first result set into a [`Frame`].
    pub async fn read_frame(&self, sql: &str) -> Result<Frame> {
        let mut conn = self.get().await?;
        let mut stream = conn.simple_query(sql).await.map_err(query_failed)?;

        let columns = stream
            .columns()
            .await
            .map_err(query_failed)?
            .map(|cols| cols.iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let mut frame = Frame::new(columns);

        for row in stream.into_first_result().await.map_err(query_failed)? {
            let cells = row
                .into_iter()
                .map(Value::from_column_data)
                .collect::<Result<Vec<_>>>()?;
            frame.push_row(cells)?;
        }

        tracing::debug!("Loaded {} rows from {}", frame.len(), self.database);
        Ok(frame)
    }
}

fn query_failed(e: tiberius::error::Error) -> DatabaseError {
    DatabaseError::QueryFailed(e.to_string())
}
