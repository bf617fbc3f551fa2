// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

use std::process::ExitCode;

use azure_data_cosmos_getting_started::{config::Config, CosmosStore, Error, GettingStarted};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Service { status, message }) => {
            eprintln!("{status:?} error occurred: {message}");
            ExitCode::FAILURE
        }
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> azure_data_cosmos_getting_started::Result<()> {
    config.validate()?;

    let store = CosmosStore::with_key(&config.endpoint, config.key)?;
    println!("Beginning operations...");

    let mut walkthrough = GettingStarted::new(store, std::io::stdout());
    walkthrough.run().await
}
