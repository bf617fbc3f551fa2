// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

//! The getting-started walkthrough: create a database and a container, then create, query, replace and delete family records.

use std::{io::Write, ops::RangeInclusive};

use futures::TryStreamExt;

use crate::{
    constants::{CONTAINER_ID, CONTAINER_THROUGHPUT, DATABASE_ID, PARTITION_KEY_PATH},
    models::FamilyRecord,
    store::{ContainerRef, DocumentStore},
    Error, Result,
};

/// Progress of a [`GettingStarted`] session. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Start,
    DatabaseReady,
    ContainerReady,
    DataSeeded,
    Queried,
    Replaced,
    Deleted,
    TornDown,
    End,
}

/// Result of [`GettingStarted::upsert_record`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpsertOutcome {
    /// A record with the same id and partition key was found; nothing was written.
    AlreadyExists,
    /// The record was not found and has been created.
    Created { request_charge: f64 },
}

/// One run of the getting-started walkthrough.
///
/// The session owns the store and the database and container it acquires, and writes a human-readable
/// report of each step to `out`. Steps must be called in order; a step called too early or too late fails with
/// [`Error::InvalidStage`] without touching the store.
///
/// ```rust,no_run
/// # async fn doc() -> azure_data_cosmos_getting_started::Result<()> {
/// use azure_data_cosmos_getting_started::{config::Config, CosmosStore, GettingStarted};
/// use clap::Parser;
///
/// let config = Config::parse();
/// let store = CosmosStore::with_key(&config.endpoint, config.key.clone())?;
/// let mut session = GettingStarted::new(store, std::io::stdout());
/// session.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct GettingStarted<S, W> {
    store: S,
    database: Option<String>,
    container: Option<ContainerRef>,
    stage: Stage,
    out: W,
}

impl<S: DocumentStore, W: Write> GettingStarted<S, W> {
    pub fn new(store: S, out: W) -> Self {
        Self {
            store,
            database: None,
            container: None,
            stage: Stage::Start,
            out,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The database acquired by [`GettingStarted::ensure_database`].
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// The container acquired by [`GettingStarted::ensure_container`].
    pub fn container(&self) -> Option<&ContainerRef> {
        self.container.as_ref()
    }

    /// Consumes the session and returns the report sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs every step with the sample families, then releases the store.
    ///
    /// The store is disposed whether or not the steps succeed. The first failing step stops the walkthrough and its error is returned;
    /// earlier steps are not undone.
    pub async fn run(&mut self) -> Result<()> {
        let outcome = self.run_steps().await;
        if let Err(error) = &outcome {
            tracing::warn!(stage = ?self.stage, %error, "walkthrough aborted");
        }
        let released = self.finish().await;
        outcome.and(released)
    }

    async fn run_steps(&mut self) -> Result<()> {
        self.ensure_database(DATABASE_ID).await?;
        self.ensure_container(CONTAINER_ID, PARTITION_KEY_PATH, CONTAINER_THROUGHPUT)
            .await?;

        self.upsert_record(&FamilyRecord::andersen()).await?;
        self.upsert_record(&FamilyRecord::wakefield()).await?;

        self.query_records("SELECT * FROM c WHERE c.LastName = 'Andersen'")
            .await?;

        self.replace_record("Wakefield.7", "Wakefield", |family| {
            family.is_registered = true;
            if let Some(child) = family.children.first_mut() {
                child.grade = 6;
            }
        })
        .await?;

        self.delete_record("Wakefield.7", "Wakefield").await?;
        self.teardown_database().await?;
        Ok(())
    }

    /// Creates the database unless it exists.
    pub async fn ensure_database(&mut self, id: &str) -> Result<()> {
        self.require(Stage::Start..=Stage::Start)?;

        self.store.create_database_if_not_exists(id).await?;
        writeln!(self.out, "Created Database: {}", id)?;

        self.database = Some(id.to_string());
        self.advance(Stage::DatabaseReady);
        Ok(())
    }

    /// Creates the container unless it exists, partitioned on `partition_key_path` with `throughput` RU/s of manual throughput.
    pub async fn ensure_container(
        &mut self,
        id: &str,
        partition_key_path: &str,
        throughput: u32,
    ) -> Result<ContainerRef> {
        self.require(Stage::DatabaseReady..=Stage::DatabaseReady)?;
        let container = ContainerRef::new(self.database_id()?, id);

        self.store
            .create_container_if_not_exists(&container, partition_key_path, throughput)
            .await?;
        writeln!(self.out, "Created Container: {}", container.id)?;

        self.container = Some(container.clone());
        self.advance(Stage::ContainerReady);
        Ok(container)
    }

    /// Creates `record` unless a record with the same id already exists in its partition.
    ///
    /// This is a read followed by a create, not an atomic upsert: the create happens only when the read reports not-found.
    /// Any other read failure is returned unchanged, and an existing record is never overwritten.
    pub async fn upsert_record(&mut self, record: &FamilyRecord) -> Result<UpsertOutcome> {
        self.require(Stage::ContainerReady..=Stage::DataSeeded)?;
        let container = self.container_ref()?.clone();

        let outcome = match self
            .store
            .read_item(&container, &record.last_name, &record.id)
            .await
        {
            Ok(_) => {
                writeln!(
                    self.out,
                    "Item in database with id: {} already exists",
                    record.id
                )?;
                UpsertOutcome::AlreadyExists
            }
            Err(error) if error.is_not_found() => {
                let request_charge = self
                    .store
                    .create_item(&container, &record.last_name, serde_json::to_value(record)?)
                    .await?;
                writeln!(
                    self.out,
                    "Created item in database with id: {} Operation consumed {} RUs.",
                    record.id, request_charge
                )?;
                UpsertOutcome::Created { request_charge }
            }
            Err(error) => return Err(error),
        };

        self.advance(Stage::DataSeeded);
        Ok(outcome)
    }

    /// Runs `query` across all partitions and reads it to the end, reporting each record as it arrives.
    pub async fn query_records(&mut self, query: &str) -> Result<Vec<FamilyRecord>> {
        self.require(Stage::DataSeeded..=Stage::Queried)?;
        let container = self.container_ref()?.clone();

        writeln!(self.out, "Running query: {}", query)?;
        let mut pages = self.store.query_items(&container, query).await?;
        let mut families = Vec::new();
        while let Some(page) = pages.try_next().await? {
            for item in page {
                let family: FamilyRecord = serde_json::from_value(item)?;
                writeln!(self.out, "\tRead {}", serde_json::to_string(&family)?)?;
                families.push(family);
            }
        }

        self.advance(Stage::Queried);
        Ok(families)
    }

    /// Reads the record, applies `mutate` to it, and writes the whole record back.
    ///
    /// The write is conditional on the etag returned by the read, so a change made by someone else in between
    /// fails with [`StatusCode::PreconditionFailed`](crate::StatusCode::PreconditionFailed) instead of being overwritten.
    pub async fn replace_record(
        &mut self,
        id: &str,
        partition_key: &str,
        mutate: impl FnOnce(&mut FamilyRecord),
    ) -> Result<FamilyRecord> {
        self.require(Stage::Queried..=Stage::Replaced)?;
        let container = self.container_ref()?.clone();

        let current = self.store.read_item(&container, partition_key, id).await?;
        let mut family: FamilyRecord = serde_json::from_value(current.item)?;
        mutate(&mut family);

        self.store
            .replace_item(
                &container,
                partition_key,
                id,
                serde_json::to_value(&family)?,
                current.etag,
            )
            .await?;
        writeln!(
            self.out,
            "Updated Family [{},{}].\n \tBody is now: {}",
            partition_key,
            id,
            serde_json::to_string(&family)?
        )?;

        self.advance(Stage::Replaced);
        Ok(family)
    }

    /// Deletes the record. Whether it existed beforehand is not checked separately; a missing record fails with not-found.
    pub async fn delete_record(&mut self, id: &str, partition_key: &str) -> Result<()> {
        self.require(Stage::Replaced..=Stage::Deleted)?;
        let container = self.container_ref()?.clone();

        self.store.delete_item(&container, partition_key, id).await?;
        writeln!(self.out, "Deleted Family [{},{}]", partition_key, id)?;

        self.advance(Stage::Deleted);
        Ok(())
    }

    /// Deletes the database, and with it the container and every record.
    pub async fn teardown_database(&mut self) -> Result<()> {
        self.require(Stage::Deleted..=Stage::Deleted)?;
        let database = self.database_id()?.to_string();

        self.store.delete_database(&database).await?;
        writeln!(self.out, "Deleted Database: {}", database)?;

        self.advance(Stage::TornDown);
        Ok(())
    }

    /// Releases the store. Allowed from any stage and idempotent; later steps fail with [`Error::InvalidStage`].
    pub async fn finish(&mut self) -> Result<()> {
        let disposed = self.store.dispose().await;
        self.advance(Stage::End);
        writeln!(self.out, "End of demo.")?;
        self.out.flush()?;
        disposed
    }

    fn require(&self, allowed: RangeInclusive<Stage>) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(Error::InvalidStage {
                expected: *allowed.start(),
                actual: self.stage,
            })
        }
    }

    fn advance(&mut self, next: Stage) {
        if next > self.stage {
            tracing::info!(from = ?self.stage, to = ?next, "walkthrough advanced");
            self.stage = next;
        }
    }

    fn database_id(&self) -> Result<&str> {
        self.database.as_deref().ok_or(Error::InvalidStage {
            expected: Stage::DatabaseReady,
            actual: self.stage,
        })
    }

    fn container_ref(&self) -> Result<&ContainerRef> {
        self.container.as_ref().ok_or(Error::InvalidStage {
            expected: Stage::ContainerReady,
            actual: self.stage,
        })
    }
}
