//! Binary entry point for the wmcp-oauth-mock server.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wmcp_oauth_mock::{DEFAULT_PORT, Error, MCP_PATH, MockServer};

/// Walrus MCP OAuth Mock: challenges every MCP call so OAuth discovery can be observed.
#[derive(Parser)]
#[command(name = "wmcp-oauth-mock", version, about)]
struct Cli {
    /// Loopback port to listen on.
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli.port).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(port: u16) -> Result<(), Error> {
    let server = MockServer::bind(port).await?;
    let config = server.config();
    eprintln!("MCP OAuth challenge test server on {}", config.base_url());
    eprintln!(
        "POST {MCP_PATH} -> 401 WWW-Authenticate resource_metadata={}",
        config.resource_metadata_url()
    );

    server.run(shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for interrupt, running until killed: {e}");
        std::future::pending::<()>().await;
    }
}
