// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod constants;
mod cosmos_store;
mod error;
pub mod models;
pub mod scenario;
pub mod store;

#[doc(inline)]
pub use cosmos_store::CosmosStore;

pub use error::*;
pub use scenario::{GettingStarted, Stage, UpsertOutcome};
pub use store::DocumentStore;
