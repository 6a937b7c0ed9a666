//! Configuration module
//!
//! Settings are read from the process environment (after loading an optional
//! `.env` file) and validated once at startup.

use std::env;
use std::time::Duration;

use crate::storage_types::{MetadataBackend, StorageBackend};

const SERVER_PORT: u16 = 5000;
const AWS_REGION: &str = "eu-north-1";
const REKOGNITION_REGION: &str = "eu-west-2";
const IMAGES_TABLE: &str = "iris-images";
const ANALYSIS_TABLE: &str = "iris-analysis";
const REKOGNITION_MAX_LABELS: i32 = 10;
const REKOGNITION_MIN_CONFIDENCE: f32 = 75.0;
const MAX_FILE_SIZE_MB: usize = 10;
const MAX_ANALYZE_SIZE_MB: usize = 15;
const PRESIGN_EXPIRY_SECS: u64 = 300;
const DEFAULT_USER_ID: &str = "demo-user";
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Settings shared by every entry point
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: String,
    pub http_concurrency_limit: usize,
}

/// Full IRIS configuration
#[derive(Clone, Debug)]
pub struct IrisConfig {
    pub base: BaseConfig,
    pub aws_region: String,
    // Image store
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // MinIO, LocalStack, ...
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Metadata store
    pub metadata_backend: MetadataBackend,
    pub images_table: String,
    pub analysis_table: String,
    pub dynamodb_endpoint: Option<String>,
    // Vision
    pub rekognition_region: String,
    pub rekognition_max_labels: i32,
    pub rekognition_min_confidence: f32,
    // Workflow limits
    pub max_file_size_bytes: usize,
    pub max_analyze_size_bytes: usize,
    pub presign_expiry_secs: u64,
    pub default_user_id: String,
}

impl Default for IrisConfig {
    fn default() -> Self {
        IrisConfig {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                log_format: "compact".to_string(),
                http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
            },
            aws_region: AWS_REGION.to_string(),
            storage_backend: StorageBackend::S3,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: None,
            local_storage_base_url: None,
            metadata_backend: MetadataBackend::DynamoDb,
            images_table: IMAGES_TABLE.to_string(),
            analysis_table: ANALYSIS_TABLE.to_string(),
            dynamodb_endpoint: None,
            rekognition_region: REKOGNITION_REGION.to_string(),
            rekognition_max_labels: REKOGNITION_MAX_LABELS,
            rekognition_min_confidence: REKOGNITION_MIN_CONFIDENCE,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            max_analyze_size_bytes: MAX_ANALYZE_SIZE_MB * 1024 * 1024,
            presign_expiry_secs: PRESIGN_EXPIRY_SECS,
            default_user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IrisConfig>);

impl Config {
    fn as_iris(&self) -> &IrisConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_iris().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IrisConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_iris().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_iris().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_iris().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_iris().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.as_iris().base.log_format
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_iris().base.http_concurrency_limit
    }

    pub fn aws_region(&self) -> &str {
        &self.as_iris().aws_region
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_iris().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_iris().s3_bucket.as_deref()
    }

    /// Region of the bucket, falling back to the general AWS region
    pub fn s3_region(&self) -> &str {
        self.as_iris()
            .s3_region
            .as_deref()
            .unwrap_or(&self.as_iris().aws_region)
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_iris().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_iris().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_iris().local_storage_base_url.as_deref()
    }

    pub fn metadata_backend(&self) -> MetadataBackend {
        self.as_iris().metadata_backend
    }

    pub fn images_table(&self) -> &str {
        &self.as_iris().images_table
    }

    pub fn analysis_table(&self) -> &str {
        &self.as_iris().analysis_table
    }

    pub fn dynamodb_endpoint(&self) -> Option<&str> {
        self.as_iris().dynamodb_endpoint.as_deref()
    }

    pub fn rekognition_region(&self) -> &str {
        &self.as_iris().rekognition_region
    }

    pub fn rekognition_max_labels(&self) -> i32 {
        self.as_iris().rekognition_max_labels
    }

    pub fn rekognition_min_confidence(&self) -> f32 {
        self.as_iris().rekognition_min_confidence
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_iris().max_file_size_bytes
    }

    pub fn max_analyze_size_bytes(&self) -> usize {
        self.as_iris().max_analyze_size_bytes
    }

    pub fn presign_expiry(&self) -> Duration {
        Duration::from_secs(self.as_iris().presign_expiry_secs)
    }

    pub fn default_user_id(&self) -> &str {
        &self.as_iris().default_user_id
    }

    /// Bucket label reported by the health check
    pub fn bucket_label(&self) -> &str {
        match self.storage_backend() {
            StorageBackend::S3 => self.s3_bucket().unwrap_or(""),
            StorageBackend::Local => "local",
        }
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl IrisConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let max_analyze_size_mb = env::var("MAX_ANALYZE_SIZE_MB")
            .unwrap_or_else(|_| MAX_ANALYZE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_ANALYZE_SIZE_MB);

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
        };

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        let metadata_backend = match env_opt("METADATA_BACKEND") {
            Some(value) => value.parse()?,
            None => MetadataBackend::DynamoDb,
        };

        Ok(IrisConfig {
            base,
            aws_region: env_opt("AWS_REGION").unwrap_or_else(|| AWS_REGION.to_string()),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET_NAME").or_else(|| env_opt("S3_BUCKET")),
            s3_region: env_opt("S3_REGION"),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            metadata_backend,
            images_table: env_opt("IMAGES_TABLE").unwrap_or_else(|| IMAGES_TABLE.to_string()),
            analysis_table: env_opt("ANALYSIS_TABLE")
                .unwrap_or_else(|| ANALYSIS_TABLE.to_string()),
            dynamodb_endpoint: env_opt("DYNAMODB_ENDPOINT"),
            rekognition_region: env_opt("AWS_REKOGNITION_REGION")
                .or_else(|| env_opt("REKOGNITION_REGION"))
                .unwrap_or_else(|| REKOGNITION_REGION.to_string()),
            rekognition_max_labels: env::var("REKOGNITION_MAX_LABELS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REKOGNITION_MAX_LABELS),
            rekognition_min_confidence: env::var("REKOGNITION_MIN_CONFIDENCE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(REKOGNITION_MIN_CONFIDENCE),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            max_analyze_size_bytes: max_analyze_size_mb * 1024 * 1024,
            presign_expiry_secs: env::var("PRESIGN_EXPIRY_SECS")
                .unwrap_or_else(|_| PRESIGN_EXPIRY_SECS.to_string())
                .parse()
                .unwrap_or(PRESIGN_EXPIRY_SECS),
            default_user_id: env_opt("DEFAULT_USER_ID")
                .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET_NAME must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.images_table == self.analysis_table {
            return Err(anyhow::anyhow!(
                "IMAGES_TABLE and ANALYSIS_TABLE must name different tables"
            ));
        }

        if !(1..=1000).contains(&self.rekognition_max_labels) {
            return Err(anyhow::anyhow!(
                "REKOGNITION_MAX_LABELS must be between 1 and 1000"
            ));
        }

        if !(0.0..=100.0).contains(&self.rekognition_min_confidence) {
            return Err(anyhow::anyhow!(
                "REKOGNITION_MIN_CONFIDENCE must be between 0 and 100"
            ));
        }

        // S3 caps presigned URLs at seven days
        if self.presign_expiry_secs == 0 || self.presign_expiry_secs > 604_800 {
            return Err(anyhow::anyhow!(
                "PRESIGN_EXPIRY_SECS must be between 1 and 604800"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        Ok(())
    }
}
