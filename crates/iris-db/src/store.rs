//! Metadata store abstraction
//!
//! Items are flat JSON objects keyed by a string `id`. Every write goes through
//! [`stamp_item`], so backends agree on how `id`, `createdAt` and `updatedAt`
//! are assigned.

use crate::error::{DbError, DbResult};
use crate::MetadataBackend;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// A schemaless metadata row
pub type Item = Map<String, Value>;

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Logical tables of the metadata store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Images,
    Analysis,
}

impl Display for Table {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Table::Images => write!(f, "images"),
            Table::Analysis => write!(f, "analysis"),
        }
    }
}

/// Physical table names, configurable per deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub images: String,
    pub analysis: String,
}

impl TableNames {
    pub fn new(images: impl Into<String>, analysis: impl Into<String>) -> Self {
        TableNames {
            images: images.into(),
            analysis: analysis.into(),
        }
    }

    pub fn name(&self, table: Table) -> &str {
        match table {
            Table::Images => &self.images,
            Table::Analysis => &self.analysis,
        }
    }
}

/// Key-value table store
#[async_trait]
pub trait MetadataStore: Send + Sync {
    /// Write a whole item after stamping `id`, `createdAt` and `updatedAt`.
    /// Returns the item as stored.
    async fn put(&self, table: Table, item: Item) -> DbResult<Item>;

    /// Fetch an item by id. Absent ids yield `None`.
    async fn get(&self, table: Table, id: &str) -> DbResult<Option<Item>>;

    /// Every item in the table, in no particular order
    async fn scan(&self, table: Table) -> DbResult<Vec<Item>>;

    /// Remove an item. Removing an absent id succeeds.
    async fn delete(&self, table: Table, id: &str) -> DbResult<()>;

    fn backend_type(&self) -> MetadataBackend;

    /// Shallow-merge `changes` into an existing item and write it back.
    ///
    /// This is a read-modify-write without a version check: concurrent
    /// updates of the same id race and the last write wins.
    async fn update(&self, table: Table, id: &str, changes: Item) -> DbResult<Item> {
        let mut item = self
            .get(table, id)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Item {} not found", id)))?;

        for (key, value) in changes {
            item.insert(key, value);
        }
        item.insert(ID_FIELD.to_string(), Value::String(id.to_string()));

        self.put(table, item).await
    }
}

/// Format a timestamp the way every stored item carries it
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Assign a fresh id when missing, keep an existing `createdAt`, and always
/// refresh `updatedAt`.
pub fn stamp_item(item: &mut Item, now: DateTime<Utc>) -> String {
    let id = match item.get(ID_FIELD).and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            let id = Uuid::new_v4().to_string();
            item.insert(ID_FIELD.to_string(), Value::String(id.clone()));
            id
        }
    };

    let timestamp = Value::String(format_timestamp(now));
    if !item.contains_key(CREATED_AT_FIELD) {
        item.insert(CREATED_AT_FIELD.to_string(), timestamp.clone());
    }
    item.insert(UPDATED_AT_FIELD.to_string(), timestamp);

    id
}
