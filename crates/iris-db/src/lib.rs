//! IRIS Database Library
//!
//! Key-value metadata storage for image and analysis records. The
//! [`MetadataStore`] trait works on schemaless JSON items and is implemented
//! by DynamoDB and in-memory backends; typed repositories sit on top.

#[cfg(feature = "dynamodb")]
mod conversions;
#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod error;
pub mod factory;
pub mod memory;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use factory::create_metadata_store;
pub use iris_core::MetadataBackend;
pub use memory::MemoryStore;
pub use repository::{AnalysisRepository, ImageRepository};
pub use store::{Item, MetadataStore, Table, TableNames};

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbStore;
