// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

//! The document store operations the walkthrough is written against.

use std::fmt;

use futures::stream::BoxStream;
use serde_json::Value;

use crate::Result;

/// Addresses a container inside a database.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    pub database: String,
    pub id: String,
}

impl ContainerRef {
    pub fn new(database: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dbs/{}/colls/{}", self.database, self.id)
    }
}

/// An item as read from the store.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredItem {
    /// The item, including its system properties.
    pub item: Value,

    /// The entity tag of the version that was read.
    pub etag: Option<String>,
}

/// Query results, one page of items per element.
///
/// The stream is finite and cannot be restarted. Dropping it before the end abandons the query.
pub type ItemPages = BoxStream<'static, Result<Vec<Value>>>;

/// Defines the document store operations used by [`GettingStarted`](crate::GettingStarted).
///
/// [`CosmosStore`](crate::CosmosStore) implements this trait over Azure Cosmos DB.
/// The trait is intended to allow you to mock out the store when testing: the walkthrough depends on a generic parameter
/// constrained by this trait rather than on the Cosmos DB client.
///
/// Every item operation takes the partition key value of the item; `(id, partition_key)` addresses a single item.
/// A missing database, container or item is reported as [`StatusCode::NotFound`](crate::StatusCode::NotFound).
pub trait DocumentStore {
    /// Creates the database unless it exists.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn create_database_if_not_exists(&self, database: &str) -> Result<()>;

    /// Creates the container unless it exists, partitioned on `partition_key_path` with `throughput` RU/s of manual throughput.
    ///
    /// An existing container is left as it is.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn create_container_if_not_exists(
        &self,
        container: &ContainerRef,
        partition_key_path: &str,
        throughput: u32,
    ) -> Result<()>;

    /// Reads a single item.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn read_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
    ) -> Result<StoredItem>;

    /// Creates a new item and returns the request charge, in request units.
    ///
    /// An item with the same id in the same partition is a [`StatusCode::Conflict`](crate::StatusCode::Conflict).
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn create_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        item: Value,
    ) -> Result<f64>;

    /// Replaces an item with `item`.
    ///
    /// With `if_match` set, the replace fails with [`StatusCode::PreconditionFailed`](crate::StatusCode::PreconditionFailed)
    /// unless the stored item still has that entity tag. Without it, the last writer wins.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn replace_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
        item: Value,
        if_match: Option<String>,
    ) -> Result<()>;

    /// Deletes an item.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn delete_item(&self, container: &ContainerRef, partition_key: &str, id: &str)
        -> Result<()>;

    /// Runs a query across every partition of the container.
    ///
    /// Nothing is sent until the first page is polled.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn query_items(&self, container: &ContainerRef, query: &str) -> Result<ItemPages>;

    /// Deletes the database with every container and item in it.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn delete_database(&self, database: &str) -> Result<()>;

    /// Releases the connection. Later calls fail with [`Error::Disposed`](crate::Error::Disposed). Idempotent.
    #[allow(async_fn_in_trait)] // REASON: See https://github.com/Azure/azure-sdk-for-rust/issues/1796 for detailed justification
    async fn dispose(&self) -> Result<()>;
}
