// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

use azure_core::credentials::Secret;
use clap::Parser;
use url::Url;

use crate::{
    constants::{EMULATOR_ENDPOINT, EMULATOR_KEY, ENDPOINT_ENV_VAR, KEY_ENV_VAR},
    Error, Result,
};

/// Connection settings for the walkthrough.
///
/// Both values come from the environment; the flags exist only to override it.
/// Without either, the local emulator's endpoint and well-known key are used.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cosmos_getting_started",
    about = "Walks through database, container and item operations against Azure Cosmos DB"
)]
pub struct Config {
    /// The account endpoint, for example https://myaccount.documents.azure.com:443/
    #[arg(long, env = ENDPOINT_ENV_VAR, default_value = EMULATOR_ENDPOINT)]
    pub endpoint: Url,

    /// The account key used to authenticate.
    #[arg(
        long,
        env = KEY_ENV_VAR,
        default_value = EMULATOR_KEY,
        value_parser = parse_key,
        hide_env_values = true,
        hide_default_value = true
    )]
    pub key: Secret,
}

impl Config {
    /// Checks that the endpoint is an absolute HTTP(S) URL with a host.
    pub fn validate(&self) -> Result<()> {
        if !matches!(self.endpoint.scheme(), "https" | "http") {
            return Err(Error::Configuration(format!(
                "endpoint '{}' must use http or https",
                self.endpoint
            )));
        }
        if self.endpoint.host_str().is_none() {
            return Err(Error::Configuration(format!(
                "endpoint '{}' has no host",
                self.endpoint
            )));
        }
        Ok(())
    }
}

fn parse_key(value: &str) -> std::result::Result<Secret, String> {
    let key = value.trim();
    if key.is_empty() {
        return Err("the account key must not be empty".to_string());
    }
    Ok(Secret::new(key.to_string()))
}
