//! Scriptwright command line entry point.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use scriptwright_core::store::DocumentStore;
use scriptwright_remote::{HttpDocumentStore, RemoteConfig};
use scriptwright_schema::SchemaRegistry;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod error;

use cli::Cli;
use error::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries command output.
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Cli { api_url, command } = Cli::parse();
    let connect = move || -> Result<Arc<dyn DocumentStore>, CliError> {
        let mut config = RemoteConfig::from_env()?;
        if let Some(api_url) = api_url.as_deref() {
            config = config.with_base_url(api_url)?;
        }
        tracing::debug!(base_url = %config.base_url, "using document store");
        let store: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::new(&config)?);
        Ok(store)
    };

    match commands::run(command, SchemaRegistry::builtin(), connect).await {
        Ok(output) => {
            print!("{}", output.text);
            if output.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            tracing::error!(%err, "command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
