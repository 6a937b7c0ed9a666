/// Prefix the long-running server mounts the routes under
pub const API_PREFIX: &str = "/api";

/// Served OpenAPI document path
pub const OPENAPI_PATH: &str = "/api/openapi.json";

pub const REQUEST_ID_HEADER: &str = "X-Request-ID";
