//! In-memory fakes for workflow and HTTP tests
//!
//! No AWS account is needed: storage and vision are mocked and metadata uses
//! [`iris_db::MemoryStore`].

pub mod mock_storage;
pub mod mock_vision;

pub use mock_storage::MockStorage;
pub use mock_vision::MockVision;

use crate::workflow::{ImageWorkflow, WorkflowSettings};
use iris_db::MemoryStore;
use std::sync::Arc;
use std::time::Duration;

/// Handles onto the fakes behind a test workflow, for assertions
pub struct TestWorkflow {
    pub workflow: ImageWorkflow,
    pub storage: Arc<MockStorage>,
    pub metadata: Arc<MemoryStore>,
    pub vision: Arc<MockVision>,
}

pub fn test_settings() -> WorkflowSettings {
    WorkflowSettings {
        default_user_id: "demo-user".to_string(),
        presign_expiry: Duration::from_secs(300),
        max_analyze_bytes: 15 * 1024 * 1024,
    }
}

/// Build a workflow over fresh fakes
pub fn create_test_workflow(vision: MockVision) -> TestWorkflow {
    create_test_workflow_with_storage(MockStorage::new(), vision)
}

pub fn create_test_workflow_with_storage(storage: MockStorage, vision: MockVision) -> TestWorkflow {
    let storage = Arc::new(storage);
    let metadata = Arc::new(MemoryStore::new());
    let vision = Arc::new(vision);

    let workflow = ImageWorkflow::new(
        storage.clone(),
        metadata.clone(),
        vision.clone(),
        test_settings(),
    );

    TestWorkflow {
        workflow,
        storage,
        metadata,
        vision,
    }
}
