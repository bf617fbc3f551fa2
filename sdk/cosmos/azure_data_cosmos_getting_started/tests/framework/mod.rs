// Copyright (c) Microsoft Corporation. All rights reserved.
// Licensed under the MIT License.

//! Shared harness for the integration tests: an in-memory [`DocumentStore`] that records calls and can inject failures.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex},
};

use azure_data_cosmos_getting_started::{
    constants::ETAG_PROPERTY,
    store::{ContainerRef, DocumentStore, ItemPages, StoredItem},
    Error, Result, StatusCode,
};
use futures::StreamExt;
use serde_json::Value;

/// Charge reported for every item write.
pub const WRITE_CHARGE: f64 = 5.71;

#[derive(Debug, Default)]
struct Container {
    partition_key_path: String,
    throughput: u32,
    /// Items keyed by `(partition key, id)`, each with its etag.
    items: BTreeMap<(String, String), (Value, String)>,
}

#[derive(Debug, Default)]
struct State {
    databases: BTreeMap<String, BTreeMap<String, Container>>,
    next_etag: u64,
}

impl State {
    fn container(&mut self, container: &ContainerRef) -> Result<&mut Container> {
        self.databases
            .get_mut(&container.database)
            .and_then(|containers| containers.get_mut(&container.id))
            .ok_or_else(|| not_found(container))
    }

    fn etag(&mut self) -> String {
        self.next_etag += 1;
        format!("\"{:08x}\"", self.next_etag)
    }
}

fn not_found(resource: impl std::fmt::Display) -> Error {
    Error::service(StatusCode::NotFound, format!("Resource Not Found: {resource}"))
}

fn bad_request(message: impl Into<String>) -> Error {
    Error::service(StatusCode::BadRequest, message)
}

/// A filter of the form `c.<property> = <literal>`.
#[derive(Debug, PartialEq)]
pub struct Filter {
    pub property: String,
    pub value: Value,
}

/// Parses `SELECT * FROM c [WHERE c.<property> = <literal>]`.
///
/// Anything else is rejected with [`StatusCode::BadRequest`]; nested or compound filters are not supported.
pub fn parse_query(query: &str) -> Result<Option<Filter>> {
    let unsupported = || bad_request(format!("unsupported query: {query}"));

    let rest = query
        .trim()
        .strip_prefix("SELECT * FROM c")
        .ok_or_else(unsupported)?
        .trim();
    if rest.is_empty() {
        return Ok(None);
    }

    let condition = rest.strip_prefix("WHERE ").ok_or_else(unsupported)?;
    let (path, literal) = condition.split_once('=').ok_or_else(unsupported)?;
    let property = path
        .trim()
        .strip_prefix("c.")
        .filter(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
        .ok_or_else(unsupported)?;

    let literal = literal.trim();
    let value = match literal
        .strip_prefix('\'')
        .and_then(|l| l.strip_suffix('\''))
    {
        Some(text) => Value::String(text.to_string()),
        None => serde_json::from_str(literal).map_err(|_| unsupported())?,
    };
    Ok(Some(Filter {
        property: property.to_string(),
        value,
    }))
}

/// An in-memory account shared by every clone of a [`MemoryStore`].
///
/// Clones share the account, the call log, the injected failures and the disposed flag.
/// [`MemoryStore::observer`] gives a separate, unrecorded connection to the same account.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    calls: Arc<Mutex<Vec<&'static str>>>,
    failures: Arc<Mutex<HashMap<&'static str, StatusCode>>>,
    disposed: Arc<Mutex<bool>>,
    open_queries: Arc<()>,
    page_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            calls: Arc::default(),
            failures: Arc::default(),
            disposed: Arc::default(),
            open_queries: Arc::new(()),
            page_size: 100,
        }
    }

    /// A connection to the same account with its own call log and disposal.
    pub fn observer(&self) -> Self {
        Self {
            state: self.state.clone(),
            open_queries: self.open_queries.clone(),
            ..Self::new()
        }
    }

    /// Serves query results `page_size` items at a time.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn calls(&self, call: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == call)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Makes every following `call` fail with `status` before it reaches the account.
    pub fn fail(&self, call: &'static str, status: StatusCode) {
        self.failures.lock().unwrap().insert(call, status);
    }

    /// Queries whose results are still held by a live stream.
    pub fn open_queries(&self) -> usize {
        Arc::strong_count(&self.open_queries) - 1
    }

    pub fn throughput(&self, container: &ContainerRef) -> Result<u32> {
        Ok(self.state.lock().unwrap().container(container)?.throughput)
    }

    fn enter(&self, call: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if *self.disposed.lock().unwrap() {
            return Err(Error::Disposed);
        }
        match self.failures.lock().unwrap().get(call) {
            Some(status) => Err(Error::service(*status, format!("injected failure in {call}"))),
            None => Ok(()),
        }
    }
}

impl DocumentStore for MemoryStore {
    async fn create_database_if_not_exists(&self, database: &str) -> Result<()> {
        self.enter("create_database_if_not_exists")?;
        self.state
            .lock()
            .unwrap()
            .databases
            .entry(database.to_string())
            .or_default();
        Ok(())
    }

    async fn create_container_if_not_exists(
        &self,
        container: &ContainerRef,
        partition_key_path: &str,
        throughput: u32,
    ) -> Result<()> {
        self.enter("create_container_if_not_exists")?;
        let mut state = self.state.lock().unwrap();
        let containers = state
            .databases
            .get_mut(&container.database)
            .ok_or_else(|| not_found(format!("dbs/{}", container.database)))?;
        containers
            .entry(container.id.clone())
            .or_insert_with(|| Container {
                partition_key_path: partition_key_path.to_string(),
                throughput,
                items: BTreeMap::new(),
            });
        Ok(())
    }

    async fn read_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
    ) -> Result<StoredItem> {
        self.enter("read_item")?;
        let mut state = self.state.lock().unwrap();
        let (item, etag) = state
            .container(container)?
            .items
            .get(&(partition_key.to_string(), id.to_string()))
            .cloned()
            .ok_or_else(|| not_found(format!("{container}/docs/{id}")))?;
        Ok(StoredItem {
            item,
            etag: Some(etag),
        })
    }

    async fn create_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        mut item: Value,
    ) -> Result<f64> {
        self.enter("create_item")?;
        let mut state = self.state.lock().unwrap();
        let etag = state.etag();
        let target = state.container(container)?;

        let id = item
            .get("id")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| bad_request("the item must have a non-empty string id"))?
            .to_string();
        let property = target.partition_key_path.trim_start_matches('/');
        if item.get(property).and_then(Value::as_str) != Some(partition_key) {
            return Err(bad_request(
                "the partition key supplied does not match the one in the item",
            ));
        }

        let key = (partition_key.to_string(), id);
        if target.items.contains_key(&key) {
            return Err(Error::service(
                StatusCode::Conflict,
                "Entity with the specified id already exists in the system.",
            ));
        }
        item[ETAG_PROPERTY] = Value::String(etag.clone());
        target.items.insert(key, (item, etag));
        Ok(WRITE_CHARGE)
    }

    async fn replace_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
        mut item: Value,
        if_match: Option<String>,
    ) -> Result<()> {
        self.enter("replace_item")?;
        let mut state = self.state.lock().unwrap();
        let etag = state.etag();
        let stored = state
            .container(container)?
            .items
            .get_mut(&(partition_key.to_string(), id.to_string()))
            .ok_or_else(|| not_found(format!("{container}/docs/{id}")))?;

        if if_match.is_some_and(|expected| expected != stored.1) {
            return Err(Error::service(
                StatusCode::PreconditionFailed,
                "Operation cannot be performed because one of the specified precondition is not met.",
            ));
        }
        item[ETAG_PROPERTY] = Value::String(etag.clone());
        *stored = (item, etag);
        Ok(())
    }

    async fn delete_item(
        &self,
        container: &ContainerRef,
        partition_key: &str,
        id: &str,
    ) -> Result<()> {
        self.enter("delete_item")?;
        self.state
            .lock()
            .unwrap()
            .container(container)?
            .items
            .remove(&(partition_key.to_string(), id.to_string()))
            .map(|_| ())
            .ok_or_else(|| not_found(format!("{container}/docs/{id}")))
    }

    async fn query_items(&self, container: &ContainerRef, query: &str) -> Result<ItemPages> {
        self.enter("query_items")?;
        let filter = parse_query(query)?;
        let matches: Vec<Value> = self
            .state
            .lock()
            .unwrap()
            .container(container)?
            .items
            .values()
            .map(|(item, _)| item)
            .filter(|item| {
                filter
                    .as_ref()
                    .is_none_or(|f| item.get(&f.property) == Some(&f.value))
            })
            .cloned()
            .collect();

        let pages: Vec<Vec<Value>> = matches
            .chunks(self.page_size)
            .map(<[Value]>::to_vec)
            .collect();
        // The stream holds a handle on `open_queries` until it is exhausted or dropped.
        let state = (pages.into_iter(), self.open_queries.clone());
        Ok(futures::stream::unfold(state, |(mut pages, open)| async move {
            pages.next().map(|page| (Ok(page), (pages, open)))
        })
        .boxed())
    }

    async fn delete_database(&self, database: &str) -> Result<()> {
        self.enter("delete_database")?;
        self.state
            .lock()
            .unwrap()
            .databases
            .remove(database)
            .map(|_| ())
            .ok_or_else(|| not_found(format!("dbs/{database}")))
    }

    async fn dispose(&self) -> Result<()> {
        self.calls.lock().unwrap().push("dispose");
        *self.disposed.lock().unwrap() = true;
        Ok(())
    }
}
