//! Application state shared by all handlers

use iris_core::Config;
use iris_services::ImageWorkflow;

pub struct AppState {
    pub config: Config,
    pub workflow: ImageWorkflow,
}

impl AppState {
    pub fn new(config: Config, workflow: ImageWorkflow) -> Self {
        Self { config, workflow }
    }
}
