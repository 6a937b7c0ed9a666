//! AWS Lambda entry point
//!
//! Serves the same routes as the server behind API Gateway, mounted at the
//! root. Configuration comes from the function's environment.

use iris_api::setup::{initialize_state, routes::lambda_routes};
use iris_core::Config;
use lambda_http::{run, Error};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    let state = initialize_state(config).await?;
    let app = lambda_routes(&state.config, state.clone());

    tracing::info!("Lambda handler ready");
    run(app).await
}
