//! Direct SQL Server connections over TDS.

use tiberius::Client;
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::config::ConnectionConfig;
use crate::session::{Connector, LivenessReport, Session, LIVENESS_QUERY};
use error::{DatabaseError, Result};

/// Driver client type over a tokio TCP stream.
pub type TdsClient = Client<Compat<TcpStream>>;

/// A live session to SQL Server, owned by whoever acquired it.
pub struct Connection {
    client: TdsClient,
}

impl Connection {
    /// Direct access to the driver client for ad-hoc queries.
    pub fn client_mut(&mut self) -> &mut TdsClient {
        &mut self.client
    }
}

impl Session for Connection {
    async fn current_database_and_time(&mut self) -> Result<LivenessReport> {
        let row = self
            .client
            .simple_query(LIVENESS_QUERY)
            .await
            .map_err(query_failed)?
            .into_row()
            .await
            .map_err(query_failed)?
            .ok_or_else(|| DatabaseError::UnexpectedResult("liveness query returned no row".into()))?;

        let database = row
            .try_get::<&str, _>(0)
            .map_err(query_failed)?
            .ok_or_else(|| DatabaseError::UnexpectedResult("DB_NAME() returned NULL".into()))?
            .to_string();
        let server_time = row
            .try_get::<chrono::NaiveDateTime, _>(1)
            .map_err(query_failed)?
            .ok_or_else(|| DatabaseError::UnexpectedResult("GETDATE() returned NULL".into()))?;

        Ok(LivenessReport {
            database,
            server_time,
        })
    }

    async fn close(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| DatabaseError::ConnectionFailed(format!("close: {e}")))?;
        tracing::debug!("Connection closed");
        Ok(())
    }
}

/// [`Connector`] backed by tiberius.
#[derive(Debug, Clone, Copy, Default)]
pub struct TdsConnector;

impl Connector for TdsConnector {
    type Session = Connection;

    async fn connect(&self, config: &ConnectionConfig) -> Result<Connection> {
        if config.connect_timeout_secs == 0 {
            return Err(DatabaseError::InvalidConfig(
                "connect_timeout_secs must be at least 1".into(),
            ));
        }
        tracing::info!("Connecting to database: {}", config.redacted_url());

        let client = tokio::time::timeout(config.connect_timeout(), open_client(config))
            .await
            .map_err(|_| DatabaseError::Timeout(config.connect_timeout_secs))??;

        tracing::info!("Connected to database {}", config.database);
        Ok(Connection { client })
    }
}

async fn open_client(config: &ConnectionConfig) -> Result<TdsClient> {
    let mut tds = config.tiberius_config();
    let tcp = connect_tcp(&tds.get_addr()).await?;

    match Client::connect(tds.clone(), tcp.compat_write()).await {
        Ok(client) => Ok(client),
        // Azure-style gateways answer the first login with a redirect.
        Err(tiberius::error::Error::Routing { host, port }) => {
            tracing::debug!("Login redirected to {}:{}", host, port);
            tds.host(&host);
            tds.port(port);
            let tcp = connect_tcp(&tds.get_addr()).await?;
            Client::connect(tds, tcp.compat_write())
                .await
                .map_err(connection_failed)
        }
        Err(e) => Err(connection_failed(e)),
    }
}

async fn connect_tcp(addr: &str) -> Result<TcpStream> {
    let tcp = TcpStream::connect(addr)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(format!("{addr}: {e}")))?;
    tcp.set_nodelay(true)
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;
    Ok(tcp)
}

fn connection_failed(e: tiberius::error::Error) -> DatabaseError {
    DatabaseError::ConnectionFailed(e.to_string())
}

fn query_failed(e: tiberius::error::Error) -> DatabaseError {
    DatabaseError::QueryFailed(e.to_string())
}
