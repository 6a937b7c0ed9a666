use crate::error::DbResult;
use crate::store::{stamp_item, Item, MetadataStore, Table};
use crate::MetadataBackend;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// In-process metadata store for development and tests
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<Table, BTreeMap<String, Item>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently held in a table
    pub async fn len(&self, table: Table) -> usize {
        self.tables
            .read()
            .await
            .get(&table)
            .map(BTreeMap::len)
            .unwrap_or(0)
    }
}

#[async_trait]
impl MetadataStore for MemoryStore {
    async fn put(&self, table: Table, mut item: Item) -> DbResult<Item> {
        let id = stamp_item(&mut item, Utc::now());
        self.tables
            .write()
            .await
            .entry(table)
            .or_default()
            .insert(id, item.clone());
        Ok(item)
    }

    async fn get(&self, table: Table, id: &str) -> DbResult<Option<Item>> {
        Ok(self
            .tables
            .read()
            .await
            .get(&table)
            .and_then(|rows| rows.get(id).cloned()))
    }

    async fn scan(&self, table: Table) -> DbResult<Vec<Item>> {
        Ok(self
            .tables
            .read()
            .await
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, table: Table, id: &str) -> DbResult<()> {
        if let Some(rows) = self.tables.write().await.get_mut(&table) {
            rows.remove(id);
        }
        Ok(())
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::Memory
    }
}
