//! Configuration module
//!
//! Settings for the backend API client, the storage backend holding evidence
//! photos and the image size limits, read from the environment (and `.env`).

use std::env;

use crate::constants::{DEFAULT_MAX_FILE_SIZE_MB, EVIDENCE_BUCKET};
use crate::storage_types::StorageBackend;

const HTTP_TIMEOUT_SECS: u64 = 60;

/// Evidence pipeline configuration
#[derive(Clone, Debug)]
pub struct EvidenceConfig {
    pub environment: String,
    // Backend API
    pub api_url: String,
    pub api_token: Option<String>,
    pub http_timeout_secs: u64,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub bucket: String,
    pub supabase_url: Option<String>,
    pub supabase_key: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Photo limits
    pub max_file_size_bytes: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_url: "http://localhost:3000".to_string(),
            api_token: None,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
            storage_backend: StorageBackend::Supabase,
            bucket: EVIDENCE_BUCKET.to_string(),
            supabase_url: None,
            supabase_key: None,
            s3_region: None,
            s3_endpoint: None,
            aws_region: None,
            local_storage_path: None,
            local_storage_base_url: None,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_MB * 1024 * 1024,
        }
    }
}

impl EvidenceConfig {
    /// Load and validate the full configuration.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = Self::read_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load settings without validating them, for commands that never reach the
    /// storage backend or the API.
    pub fn read_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or(defaults.environment);

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => defaults.storage_backend,
        };

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(DEFAULT_MAX_FILE_SIZE_MB);

        let config = EvidenceConfig {
            environment,
            api_url: env::var("FLEET_API_URL")
                .or_else(|_| env::var("API_URL"))
                .unwrap_or(defaults.api_url),
            api_token: non_empty_var("FLEET_API_TOKEN"),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
            storage_backend,
            bucket: env::var("EVIDENCE_BUCKET").unwrap_or(defaults.bucket),
            supabase_url: non_empty_var("SUPABASE_URL"),
            supabase_key: non_empty_var("SUPABASE_KEY"),
            s3_region: non_empty_var("S3_REGION"),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            aws_region: non_empty_var("AWS_REGION"),
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: non_empty_var("LOCAL_STORAGE_BASE_URL"),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
        };

        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        matches!(
            self.environment.to_lowercase().as_str(),
            "production" | "prod"
        )
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!("FLEET_API_URL must be an http(s) URL"));
        }

        if self.is_production() && self.api_url.starts_with("http://") {
            return Err(anyhow::anyhow!(
                "FLEET_API_URL must use https in production"
            ));
        }

        if self.bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("EVIDENCE_BUCKET cannot be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        match self.storage_backend {
            StorageBackend::Supabase => {
                if self.supabase_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_URL must be set when using Supabase storage backend"
                    ));
                }
                if self.supabase_key.is_none() {
                    return Err(anyhow::anyhow!(
                        "SUPABASE_KEY must be set when using Supabase storage backend"
                    ));
                }
            }
            StorageBackend::S3 => {
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
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

        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}
