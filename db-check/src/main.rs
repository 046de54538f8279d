use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use db::{ConnectionConfig, ConnectionProvider};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the liveness report only.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "db=info,db_check=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match ConnectionConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(2);
        }
    };
    tracing::info!("Checking database at {}", config.redacted_url());

    let provider = ConnectionProvider::new(config);
    if provider.check_liveness().await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
