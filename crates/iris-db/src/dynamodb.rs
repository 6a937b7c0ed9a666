//! DynamoDB metadata backend.
//!
//! Each logical table maps to one DynamoDB table whose partition key is the
//! string attribute `id`. No secondary indexes are used.

use crate::conversions::{attributes_to_item, item_to_attributes};
use crate::error::{DbError, DbResult};
use crate::store::{stamp_item, Item, MetadataStore, Table, TableNames, ID_FIELD};
use crate::MetadataBackend;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use chrono::Utc;

/// DynamoDB-backed metadata store
#[derive(Clone)]
pub struct DynamoDbStore {
    client: DynamoDbClient,
    tables: TableNames,
}

impl DynamoDbStore {
    /// Create a store for the given region
    ///
    /// # Arguments
    /// * `region` - AWS region hosting the tables
    /// * `endpoint_url` - Optional endpoint override (e.g., "http://localhost:8000" for DynamoDB Local)
    /// * `tables` - Physical table names
    pub async fn new(region: &str, endpoint_url: Option<&str>, tables: TableNames) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()));

        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let config = loader.load().await;
        Self::from_client(DynamoDbClient::new(&config), tables)
    }

    pub fn from_client(client: DynamoDbClient, tables: TableNames) -> Self {
        DynamoDbStore { client, tables }
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

fn backend_error<E>(table: &str, operation: &str, err: E) -> DbError
where
    E: std::error::Error,
{
    let message = DisplayErrorContext(&err).to_string();
    tracing::error!(
        table = %table,
        operation = %operation,
        error = %message,
        "DynamoDB request failed"
    );
    DbError::Backend(message)
}

#[async_trait]
impl MetadataStore for DynamoDbStore {
    async fn put(&self, table: Table, mut item: Item) -> DbResult<Item> {
        let table_name = self.tables.name(table);
        let id = stamp_item(&mut item, Utc::now());
        let start = std::time::Instant::now();

        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item_to_attributes(item.clone())))
            .send()
            .await
            .map_err(|e| backend_error(table_name, "PutItem", e))?;

        tracing::debug!(
            table = %table_name,
            id = %id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "DynamoDB put successful"
        );

        Ok(item)
    }

    async fn get(&self, table: Table, id: &str) -> DbResult<Option<Item>> {
        let table_name = self.tables.name(table);

        let output = self
            .client
            .get_item()
            .table_name(table_name)
            .key(ID_FIELD, Self::key(id))
            .send()
            .await
            .map_err(|e| backend_error(table_name, "GetItem", e))?;

        output.item().map(attributes_to_item).transpose()
    }

    async fn scan(&self, table: Table) -> DbResult<Vec<Item>> {
        let table_name = self.tables.name(table);
        let start = std::time::Instant::now();

        // The paginator follows LastEvaluatedKey so the result is complete
        let mut pages = self
            .client
            .scan()
            .table_name(table_name)
            .into_paginator()
            .send();

        let mut items = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| backend_error(table_name, "Scan", e))?;
            for attributes in page.items() {
                items.push(attributes_to_item(attributes)?);
            }
        }

        tracing::debug!(
            table = %table_name,
            count = items.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "DynamoDB scan successful"
        );

        Ok(items)
    }

    async fn delete(&self, table: Table, id: &str) -> DbResult<()> {
        let table_name = self.tables.name(table);

        self.client
            .delete_item()
            .table_name(table_name)
            .key(ID_FIELD, Self::key(id))
            .send()
            .await
            .map_err(|e| backend_error(table_name, "DeleteItem", e))?;

        tracing::debug!(table = %table_name, id = %id, "DynamoDB delete successful");

        Ok(())
    }

    fn backend_type(&self) -> MetadataBackend {
        MetadataBackend::DynamoDb
    }
}
