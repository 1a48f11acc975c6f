//! Notes server binary.
//!
//! Picks the storage backend from the connection string and hands it to the
//! API layer, which stays agnostic of the backend.

use clap::Parser;
use miette::Diagnostic;
use notes::api::{self, ApiError};
use notes::config::{Cli, Command};
use notes::logging::init_tracing;
use notes::store::{Store, StoreError, Storer};
use thiserror::Error;
use tracing::info;

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error("Store error: {0}")]
    #[diagnostic(code(notes::binary::store))]
    Store(#[from] StoreError),

    #[error("API server error: {0}")]
    #[diagnostic(code(notes::binary::api))]
    Api(#[from] ApiError),
}

#[tokio::main]
async fn main() -> Result<(), BinaryError> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let store = Store::connect(cli.database_url(), cli.ca_bundle()).await?;

    match cli.command() {
        Command::Serve => api::run(cli.server_config(), store).await?,
        Command::Migrate => {
            info!(backend = %store.backend(), "notes schema is up to date");
            store.close().await?;
        }
    }

    Ok(())
}
