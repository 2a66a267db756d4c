//! Object storage provider trait definition

use crate::error::Result;
use async_trait::async_trait;

/// Object storage provider abstraction trait
///
/// Creation must map the provider's "bucket already exists and is yours"
/// class of errors to [`crate::CloudError::ResourceAlreadyExists`] so the
/// upload workflow can treat a lost check-then-create race as success.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Returns the provider name (e.g., "aws-s3")
    fn name(&self) -> &str;

    /// List the names of all buckets owned by the caller
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Create a bucket with the given name
    async fn create_bucket(&self, name: &str) -> Result<()>;

    /// Store a byte sequence under `key` in `bucket`
    ///
    /// The whole body is buffered in memory by the caller; implementations
    /// may split it into a multipart transfer internally.
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}
