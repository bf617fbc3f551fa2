// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

use async_lock::RwLock;
use azure_core::{
    credentials::Secret,
    http::{headers::Headers, Etag},
};
use azure_data_cosmos::{
    clients::ContainerClient,
    models::{ContainerProperties, ThroughputProperties},
    CosmosClient, CreateContainerOptions, ItemOptions, PartitionKey, QueryPartitionStrategy,
};
use futures::{StreamExt, TryStreamExt};
use serde_json::Value;
use url::Url;

use crate::{
    constants::{ETAG_PROPERTY, REQUEST_CHARGE},
    store::{ContainerRef, DocumentStore, ItemPages, StoredItem},
    Error, Result, StatusCode,
};

/// A [`DocumentStore`] backed by an Azure Cosmos DB account.
///
/// Disposing the store drops its [`CosmosClient`]; later calls fail with [`Error::Disposed`].
pub struct CosmosStore {
    client: RwLock<Option<CosmosClient>>,
}

impl CosmosStore {
    /// Creates a store over an existing client.
    pub fn new(client: CosmosClient) -> Self {
        Self {
            client: RwLock::new(Some(client)),
        }
    }

    /// Creates a store that authenticates to `endpoint` with an account key.
    ///
    /// No request is sent until the first operation.
    pub fn with_key(endpoint: &Url, key: Secret) -> Result<Self> {
        let client = CosmosClient::with_key(endpoint.as_str(), key, None)?;
        Ok(Self::new(client))
    }

    async fn client(&self) -> Result<CosmosClient> {
        self.client.read().await.clone().ok_or(Error::Disposed)
    }

    async fn container_client(&self, container: &ContainerRef) -> Result<ContainerClient> {
        Ok(self
            .client()
            .await?
            .database_client(&container.database)
            .container_client(&container.id))
    }
}

/// Treats a conflict on create as "already exists".
fn created_or_exists<T>(result: azure_core::Result<T>) -> Result<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(error) if error.http_status() == Some(StatusCode::Conflict) => Ok(false),
        Err(error) => Err(error.into()),
    }
}

fn request_charge(headers: &Headers) -> f64 {
    headers
        .get_optional_str(&REQUEST_CHARGE)
        .and_then(|charge| charge.parse().ok())
        .unwrap_or_default()
}

impl DocumentStore for CosmosStore {
    async fn create_database_if_not_exists(&self, database: &str) -> Result<()> {
        let client = self.client().await?;
        let created = match client.database_client(database).read(None).await {
            Ok(_) => false,
            Err(error) if error.http_status() == Some(StatusCode::NotFound) => {
                created_or_exists(client.create_database(database, None).await)?
            }
            Err(error) => return Err(error.into()),
        };
        tracing::debug!(database, created, "ensured database");
        Ok(())
    }

    async fn create_container_if_not_exists(
        &self,
        container: &ContainerRef,
        partition_key_path: &str,
        throughput: u32,
    ) -> Result<()> {
        let database = self.client().await?.database_client(&container.database);
        let created = match database.container_client(&container.id).read(None).await {
            Ok(_) => false,
            Err(error) if error.http_status() == Some(StatusCode::NotFound) => {
                let properties = ContainerProperties {
                    id: container.id.clone().into(),
                    partition_key: partition_key_path.into(),
                    ..Default::default()
                };
                let options = CreateContainerOptions {
                    throughput: Some(ThroughputProperties::manual(throughput as usize)),
                    ..Default::default()
                };
                created_or_exists(database.create_container(properties, Some(options)).await)?
            }
            Err(error) => return Err(error.into()),
        };
        tracing::debug!(%container, partition_key_path, throughput, created, "ensured container");
        Ok(())
    }

    async fn read_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
    ) -> Result<StoredItem> {
        let response = self
            .container_client(container)
            .await?
            .read_item::<Value>(PartitionKey::from(partition_key.to_string()), id, None)
            .await?;
        tracing::debug!(
            %container,
            partition_key,
            id,
            request_charge = request_charge(response.headers()),
            "read item"
        );

        let item = response.into_model()?;
        let etag = item
            .get(ETAG_PROPERTY)
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(StoredItem { item, etag })
    }

    async fn create_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        item: Value,
    ) -> Result<f64> {
        let response = self
            .container_client(container)
            .await?
            .create_item(PartitionKey::from(partition_key.to_string()), item, None)
            .await?;
        let request_charge = request_charge(response.headers());
        tracing::debug!(%container, partition_key, request_charge, "created item");
        Ok(request_charge)
    }

    async fn replace_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
        item: Value,
        if_match: Option<String>,
    ) -> Result<()> {
        let options = if_match.map(|etag| ItemOptions {
            if_match_etag: Some(Etag::from(etag)),
            ..Default::default()
        });
        let response = self
            .container_client(container)
            .await?
            .replace_item(PartitionKey::from(partition_key.to_string()), id, item, options)
            .await?;
        tracing::debug!(
            %container,
            partition_key,
            id,
            request_charge = request_charge(response.headers()),
            "replaced item"
        );
        Ok(())
    }

    async fn delete_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
    ) -> Result<()> {
        let response = self
            .container_client(container)
            .await?
            .delete_item(PartitionKey::from(partition_key.to_string()), id, None)
            .await?;
        tracing::debug!(
            %container,
            partition_key,
            id,
            request_charge = request_charge(response.headers()),
            "deleted item"
        );
        Ok(())
    }

    async fn query_items(&self, container: &ContainerRef, query: &str) -> Result<ItemPages> {
        tracing::debug!(%container, query, "querying items");
        let pager = self
            .container_client(container)
            .await?
            .query_items::<Value>(query, QueryPartitionStrategy::CrossPartition, None)?;
        Ok(pager
            .map_ok(|page| page.into_items())
            .map_err(Error::from)
            .boxed())
    }

    async fn delete_database(&self, database: &str) -> Result<()> {
        self.client()
            .await?
            .database_client(database)
            .delete(None)
            .await?;
        tracing::debug!(database, "deleted database");
        Ok(())
    }

    async fn dispose(&self) -> Result<()> {
        if self.client.write().await.take().is_some() {
            tracing::debug!("released cosmos client");
        }
        Ok(())
    }
}
