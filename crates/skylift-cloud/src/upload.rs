//! Bucket upload workflow
//!
//! Ensure the bucket exists, read the local file fully into memory, then
//! hand the bytes to the storage provider. The file is read before any
//! upload call so a missing file never leaves a half-done transfer behind.

use crate::error::{CloudError, Result};
use crate::storage::StorageProvider;
use std::path::Path;

/// Ensure a bucket with the given name exists
///
/// Returns `true` when this run created the bucket, `false` when it was
/// already there (including the case where a concurrent run created it
/// between our list and create calls).
pub async fn ensure_bucket<S: StorageProvider + ?Sized>(storage: &S, name: &str) -> Result<bool> {
    let buckets = storage.list_buckets().await?;
    if buckets.iter().any(|b| b == name) {
        tracing::debug!(provider = storage.name(), bucket = name, "bucket already exists");
        return Ok(false);
    }

    match storage.create_bucket(name).await {
        Ok(()) => {
            tracing::info!(bucket = name, "bucket created");
            Ok(true)
        }
        Err(CloudError::ResourceAlreadyExists(_)) => {
            tracing::debug!(bucket = name, "bucket appeared concurrently");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Read a local file and store it under `key` in `bucket`
///
/// Returns the number of bytes uploaded.
pub async fn upload_file<S: StorageProvider + ?Sized>(
    storage: &S,
    bucket: &str,
    key: &str,
    path: &Path,
) -> Result<u64> {
    let body = tokio::fs::read(path)
        .await
        .map_err(|source| CloudError::FileRead {
            path: path.display().to_string(),
            source,
        })?;

    let size = body.len() as u64;
    tracing::info!(bucket, key, size, "uploading object");

    storage.put_object(bucket, key, body).await?;
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::io::Write;
    use std::sync::Mutex;

    struct MockStorage {
        buckets: Vec<String>,
        create_conflicts: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MockStorage {
        fn new(buckets: &[&str]) -> Self {
            Self {
                buckets: buckets.iter().map(|b| b.to_string()).collect(),
                create_conflicts: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StorageProvider for MockStorage {
        fn name(&self) -> &str {
            "mock"
        }

        async fn list_buckets(&self) -> Result<Vec<String>> {
            self.record("list_buckets");
            Ok(self.buckets.clone())
        }

        async fn create_bucket(&self, name: &str) -> Result<()> {
            self.record(format!("create_bucket:{name}"));
            if self.create_conflicts {
                return Err(CloudError::ResourceAlreadyExists(name.to_string()));
            }
            Ok(())
        }

        async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
            self.record(format!("put_object:{bucket}:{key}:{}", body.len()));
            Ok(())
        }
    }

    fn temp_file(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[tokio::test]
    async fn existing_bucket_is_not_recreated() {
        let storage = MockStorage::new(&["logs", "artifacts"]);

        let created = ensure_bucket(&storage, "artifacts").await.unwrap();
        assert!(!created);
        assert_eq!(storage.calls(), vec!["list_buckets"]);
    }

    #[tokio::test]
    async fn missing_bucket_is_created() {
        let storage = MockStorage::new(&["logs"]);

        let created = ensure_bucket(&storage, "artifacts").await.unwrap();
        assert!(created);
        assert_eq!(storage.calls(), vec!["list_buckets", "create_bucket:artifacts"]);
    }

    #[tokio::test]
    async fn lost_create_race_counts_as_existing() {
        let mut storage = MockStorage::new(&[]);
        storage.create_conflicts = true;

        let created = ensure_bucket(&storage, "artifacts").await.unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn upload_sends_file_bytes() {
        let storage = MockStorage::new(&[]);
        let file = temp_file(b"hello skylift");

        let size = upload_file(&storage, "artifacts", "greeting.txt", file.path())
            .await
            .unwrap();

        assert_eq!(size, 13);
        assert_eq!(storage.calls(), vec!["put_object:artifacts:greeting.txt:13"]);
    }

    #[tokio::test]
    async fn missing_file_fails_before_any_upload_call() {
        let storage = MockStorage::new(&[]);

        let err = upload_file(
            &storage,
            "artifacts",
            "greeting.txt",
            Path::new("/no/such/file.txt"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CloudError::FileRead { .. }));
        assert!(err.to_string().contains("/no/such/file.txt"));
        assert!(storage.calls().is_empty());
    }
}
