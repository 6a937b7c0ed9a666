//! Typed repositories over the item-level [`MetadataStore`].

use crate::error::{DbError, DbResult};
use crate::store::{Item, MetadataStore, Table};
use iris_core::models::{AnalysisRecord, ImageRecord, NewImage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

fn to_item<T: Serialize>(value: &T) -> DbResult<Item> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(DbError::Conversion(format!(
            "expected an object, got {}",
            other
        ))),
    }
}

fn from_item<T: DeserializeOwned>(item: Item) -> DbResult<T> {
    Ok(serde_json::from_value(Value::Object(item))?)
}

/// Decode scanned rows, skipping any that cannot be read so one bad row
/// does not hide the rest of the table.
fn decode_rows<T: DeserializeOwned>(table: Table, items: Vec<Item>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| {
            let id = item
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            match from_item(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(table = %table, id = %id, error = %e, "Skipping unreadable row");
                    None
                }
            }
        })
        .collect()
}

/// Image metadata records
#[derive(Clone)]
pub struct ImageRepository {
    store: Arc<dyn MetadataStore>,
}

impl ImageRepository {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self, image), fields(name = %image.name, s3_key = %image.s3_key))]
    pub async fn create(&self, image: NewImage) -> DbResult<ImageRecord> {
        let stored = self.store.put(Table::Images, to_item(&image)?).await?;
        from_item(stored)
    }

    pub async fn get(&self, id: &str) -> DbResult<Option<ImageRecord>> {
        self.store
            .get(Table::Images, id)
            .await?
            .map(from_item)
            .transpose()
    }

    /// All images, newest first
    pub async fn list(&self) -> DbResult<Vec<ImageRecord>> {
        let rows = self.store.scan(Table::Images).await?;
        let mut images: Vec<ImageRecord> = decode_rows(Table::Images, rows);

        images.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(images)
    }

    /// Flag an image as analyzed and record its top label names
    pub async fn mark_analyzed(&self, id: &str, ai_tags: Vec<String>) -> DbResult<ImageRecord> {
        let changes = to_item(&json!({
            "analyzed": true,
            "aiTags": ai_tags,
        }))?;
        let updated = self.store.update(Table::Images, id, changes).await?;
        from_item(updated)
    }

    pub async fn delete(&self, id: &str) -> DbResult<()> {
        self.store.delete(Table::Images, id).await
    }
}

/// Analysis records, keyed by the analyzed image's id
#[derive(Clone)]
pub struct AnalysisRepository {
    store: Arc<dyn MetadataStore>,
}

impl AnalysisRepository {
    pub fn new(store: Arc<dyn MetadataStore>) -> Self {
        Self { store }
    }

    /// Write an analysis, replacing any previous one for the same image
    pub async fn save(&self, analysis: &AnalysisRecord) -> DbResult<AnalysisRecord> {
        let stored = self.store.put(Table::Analysis, to_item(analysis)?).await?;
        from_item(stored)
    }

    pub async fn get(&self, image_id: &str) -> DbResult<Option<AnalysisRecord>> {
        self.store
            .get(Table::Analysis, image_id)
            .await?
            .map(from_item)
            .transpose()
    }

    pub async fn list(&self) -> DbResult<Vec<AnalysisRecord>> {
        let rows = self.store.scan(Table::Analysis).await?;
        Ok(decode_rows(Table::Analysis, rows))
    }

    pub async fn delete(&self, image_id: &str) -> DbResult<()> {
        self.store.delete(Table::Analysis, image_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::Utc;
    use iris_core::models::{Detections, Label};
    use std::time::Duration;

    fn new_image(name: &str) -> NewImage {
        NewImage {
            user_id: "demo-user".to_string(),
            name: name.to_string(),
            s3_key: format!("images/1-{}", name),
            s3_url: format!("http://localhost/images/1-{}", name),
            bucket: "local".to_string(),
            size: Some(500),
            mime_type: Some("image/png".to_string()),
            analyzed: false,
            ai_tags: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = ImageRepository::new(Arc::new(MemoryStore::new()));

        let image = repo.create(new_image("cat.png")).await.unwrap();

        assert!(!image.id.is_empty());
        assert!(!image.analyzed);
        assert_eq!(image.created_at, image.updated_at);
        assert_eq!(repo.get(&image.id).await.unwrap(), Some(image));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = ImageRepository::new(Arc::new(MemoryStore::new()));

        let first = repo.create(new_image("a.png")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let second = repo.create(new_image("b.png")).await.unwrap();

        let ids: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|image| image.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_tolerates_partial_and_unreadable_rows() {
        let store = Arc::new(MemoryStore::new());
        let repo = ImageRepository::new(store.clone());
        let full = repo.create(new_image("cat.png")).await.unwrap();

        let partial = json!({
            "name": "old.png",
            "s3Key": "images/1-old.png",
            "bucket": "local",
            "userId": "demo-user",
        });
        store
            .put(Table::Images, to_item(&partial).unwrap())
            .await
            .unwrap();
        let unreadable = json!({ "name": "bad.png", "analyzed": "yes" });
        store
            .put(Table::Images, to_item(&unreadable).unwrap())
            .await
            .unwrap();

        let images = repo.list().await.unwrap();
        assert_eq!(images.len(), 2);
        assert!(images.iter().any(|image| image.id == full.id));
        let old = images.iter().find(|image| image.name == "old.png").unwrap();
        assert_eq!(old.s3_url, "");
        assert_eq!(old.size, None);
    }

    #[tokio::test]
    async fn test_analysis_list_tolerates_missing_fields() {
        let store = Arc::new(MemoryStore::new());
        let repo = AnalysisRepository::new(store.clone());
        store
            .put(Table::Analysis, to_item(&json!({ "id": "img-1" })).unwrap())
            .await
            .unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].labels.is_empty());
    }

    #[tokio::test]
    async fn test_mark_analyzed_sets_tags() {
        let repo = ImageRepository::new(Arc::new(MemoryStore::new()));
        let image = repo.create(new_image("cat.png")).await.unwrap();

        let updated = repo
            .mark_analyzed(&image.id, vec!["Cat".to_string(), "Pet".to_string()])
            .await
            .unwrap();

        assert!(updated.analyzed);
        assert_eq!(updated.ai_tags, vec!["Cat", "Pet"]);
        assert_eq!(updated.created_at, image.created_at);
    }

    #[tokio::test]
    async fn test_mark_analyzed_missing_image() {
        let repo = ImageRepository::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            repo.mark_analyzed("missing", Vec::new()).await,
            Err(DbError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_analysis_save_overwrites() {
        let repo = AnalysisRepository::new(Arc::new(MemoryStore::new()));
        let detections = Detections {
            labels: vec![Label {
                name: "Cat".to_string(),
                confidence: 98.0,
            }],
            ..Detections::default()
        };

        repo.save(&AnalysisRecord::new("img-1", detections, Utc::now()))
            .await
            .unwrap();
        repo.save(&AnalysisRecord::new("img-1", Detections::default(), Utc::now()))
            .await
            .unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].labels.is_empty());
        assert_eq!(repo.get("img-1").await.unwrap().unwrap().image_id, "img-1");
    }
}
