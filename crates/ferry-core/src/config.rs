//! Configuration module
//!
//! Environment-driven process configuration: the HDFS shell program, default
//! object-store session settings, and the default session reuse policy.

use std::env;

const DEFAULT_HADOOP_BIN: &str = "hadoop";

/// Process configuration, loaded once from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    environment: String,
    hadoop_bin: String,
    s3_region: Option<String>,
    s3_endpoint: Option<String>,
    gcs_service_account: Option<String>,
    session_reuse: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let session_reuse = env::var("SESSION_REUSE")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        Ok(Config {
            environment,
            hadoop_bin: env::var("HADOOP_BIN").unwrap_or_else(|_| DEFAULT_HADOOP_BIN.to_string()),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            gcs_service_account: env::var("GCS_SERVICE_ACCOUNT").ok(),
            session_reuse,
        })
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Program invoked for HDFS namespace operations (`<bin> fs ...`).
    pub fn hadoop_bin(&self) -> &str {
        &self.hadoop_bin
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.s3_endpoint.as_deref()
    }

    pub fn gcs_service_account(&self) -> Option<&str> {
        self.gcs_service_account.as_deref()
    }

    /// Default for reusing object-store sessions across transfers.
    pub fn session_reuse(&self) -> bool {
        self.session_reuse
    }
}
