//! Connection provider: connections, engines and the liveness check.

use std::io::{self, Write};

use crate::config::ConnectionConfig;
use crate::connection::TdsConnector;
use crate::engine::Engine;
use crate::session::{Connector, LivenessReport, Session};
use error::Result;

/// Hands out database access objects built from one immutable configuration.
pub struct ConnectionProvider<C = TdsConnector> {
    config: ConnectionConfig,
    connector: C,
}

impl ConnectionProvider<TdsConnector> {
    /// Create a provider that talks to SQL Server.
    pub fn new(config: ConnectionConfig) -> Self {
        Self::with_connector(config, TdsConnector)
    }
}

impl<C: Connector> ConnectionProvider<C> {
    /// Create a provider with a custom connector.
    pub fn with_connector(config: ConnectionConfig, connector: C) -> Self {
        Self { config, connector }
    }

    /// Configuration every operation connects with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Open a direct connection. The caller owns it and must close it.
    pub async fn acquire_connection(&self) -> Result<C::Session> {
        self.connector.connect(&self.config).await.map_err(|e| {
            tracing::error!("Error connecting to database: {}", e.detail());
            e
        })
    }

    /// Build a pooled engine for bulk reads.
    pub async fn acquire_engine(&self) -> Result<Engine> {
        Engine::new(&self.config).await
    }

    /// Connect, run the liveness query and close, on every exit path.
    pub async fn liveness_report(&self) -> Result<LivenessReport> {
        let session = self.acquire_connection().await?;
        run_liveness_query(session).await
    }

    /// Liveness check reporting to stdout.
    pub async fn check_liveness(&self) -> bool {
        self.check_liveness_to(&mut io::stdout()).await
    }

    /// Liveness check reporting to `out`.
    ///
    /// Writes two report lines on success, otherwise a single diagnostic
    /// line.
    pub async fn check_liveness_to<W: Write>(&self, out: &mut W) -> bool {
        let session = match self.acquire_connection().await {
            Ok(session) => session,
            Err(e) => {
                emit(out, format_args!("Error connecting to database: {}", e.detail()));
                return false;
            }
        };

        match run_liveness_query(session).await {
            Ok(report) => {
                emit(out, format_args!("✅ Connected to database: {}", report.database));
                emit(out, format_args!("⏰ Server time: {}", report.server_time));
                true
            }
            Err(e) => {
                tracing::error!("Liveness query failed: {}", e.detail());
                emit(out, format_args!("Liveness query failed: {}", e.detail()));
                false
            }
        }
    }
}

async fn run_liveness_query<S: Session>(mut session: S) -> Result<LivenessReport> {
    let result = session.current_database_and_time().await;
    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close connection: {}", e);
    }
    result
}

fn emit<W: Write>(out: &mut W, line: std::fmt::Arguments<'_>) {
    if let Err(e) = writeln!(out, "{line}") {
        tracing::warn!("Failed to write liveness output: {}", e);
    }
}
