//! Storage configuration types.

#[cfg(feature = "config")]
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

/// Storage backend selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum BackendType {
    /// Amazon S3 compatible storage.
    S3,
    /// Local filesystem.
    #[default]
    Fs,
    /// In-memory store (tests and local development).
    Memory,
}

/// Storage backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct StorageConfig {
    /// Which backend to use.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-backend", env = "STORAGE_BACKEND", default_value = "fs")
    )]
    pub backend_type: BackendType,

    /// Bucket name (S3) or root directory (filesystem).
    #[cfg_attr(feature = "config", arg(long = "storage-root", env = "STORAGE_ROOT"))]
    pub root: String,

    /// S3 region.
    #[cfg_attr(feature = "config", arg(long = "storage-region", env = "STORAGE_REGION"))]
    pub region: Option<String>,

    /// Custom S3 endpoint (e.g. MinIO).
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-endpoint", env = "STORAGE_ENDPOINT")
    )]
    pub endpoint: Option<String>,

    /// S3 access key id.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-access-key-id", env = "STORAGE_ACCESS_KEY_ID")
    )]
    pub access_key_id: Option<String>,

    /// S3 secret access key.
    #[cfg_attr(
        feature = "config",
        arg(long = "storage-secret-access-key", env = "STORAGE_SECRET_ACCESS_KEY")
    )]
    pub secret_access_key: Option<String>,
}

impl StorageConfig {
    /// Creates a filesystem configuration rooted at the given directory.
    pub fn fs(root: impl Into<String>) -> Self {
        Self {
            backend_type: BackendType::Fs,
            root: root.into(),
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Creates an in-memory configuration.
    pub fn memory() -> Self {
        Self {
            backend_type: BackendType::Memory,
            root: String::new(),
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Creates an S3 configuration for the given bucket.
    pub fn s3(bucket: impl Into<String>) -> Self {
        Self {
            backend_type: BackendType::S3,
            root: bucket.into(),
            region: None,
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
        }
    }

    /// Sets the S3 region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets a custom S3 endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the S3 credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
    ) -> Self {
        self.access_key_id = Some(access_key_id.into());
        self.secret_access_key = Some(secret_access_key.into());
        self
    }

    /// Returns the backend name as a static string.
    pub fn backend_name(&self) -> &'static str {
        match self.backend_type {
            BackendType::S3 => "s3",
            BackendType::Fs => "fs",
            BackendType::Memory => "memory",
        }
    }
}
