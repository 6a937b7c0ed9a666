use crate::memory::MemoryStore;
use crate::store::{MetadataStore, TableNames};
use crate::MetadataBackend;
use iris_core::Config;
use std::sync::Arc;

/// Create a metadata store based on configuration
pub async fn create_metadata_store(config: &Config) -> Result<Arc<dyn MetadataStore>, anyhow::Error> {
    match config.metadata_backend() {
        #[cfg(feature = "dynamodb")]
        MetadataBackend::DynamoDb => {
            let tables = TableNames::new(config.images_table(), config.analysis_table());
            let store = crate::DynamoDbStore::new(
                config.aws_region(),
                config.dynamodb_endpoint(),
                tables.clone(),
            )
            .await;

            tracing::info!(
                images_table = %tables.images,
                analysis_table = %tables.analysis,
                region = %config.aws_region(),
                "DynamoDB metadata store initialized"
            );
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "dynamodb"))]
        MetadataBackend::DynamoDb => Err(anyhow::anyhow!(
            "DynamoDB metadata backend not available (dynamodb feature not enabled)"
        )),

        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory metadata store; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
