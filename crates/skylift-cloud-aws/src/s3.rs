//! S3 implementation of the storage provider
//!
//! Uploads below [`MULTIPART_THRESHOLD`] go through a single PutObject;
//! larger bodies are split into a multipart transfer that is aborted on
//! failure (S3 keeps charging for abandoned parts until they are aborted).

use crate::error::api_error;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CompletedMultipartUpload, CompletedPart, CreateBucketConfiguration,
};
use skylift_cloud::{CloudError, Result, StorageProvider};

/// Bodies at or above this size are sent as a multipart upload
const MULTIPART_THRESHOLD: usize = 8 * 1024 * 1024;

/// Part size for multipart transfers (S3 minimum is 5 MiB)
const PART_SIZE: usize = 8 * 1024 * 1024;

/// S3-backed storage provider
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    region: String,
}

impl S3Storage {
    /// Build a client from ambient credentials and an explicit region
    pub async fn connect(region: &str) -> Result<Self> {
        let config = crate::config::sdk_config(region).await?;
        tracing::debug!(region, "S3 client ready");
        Ok(Self {
            client: aws_sdk_s3::Client::new(&config),
            region: region.to_string(),
        })
    }

    /// Wrap an existing SDK client (custom endpoints, test stacks)
    pub fn from_client(client: aws_sdk_s3::Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    async fn multipart_upload(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| api_error("CreateMultipartUpload", &e))?;

        let upload_id = created
            .upload_id()
            .ok_or_else(|| {
                CloudError::ApiError("CreateMultipartUpload returned no upload id".to_string())
            })?
            .to_string();

        match self.upload_parts(bucket, key, &upload_id, &body).await {
            Ok(parts) => {
                self.client
                    .complete_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .multipart_upload(
                        CompletedMultipartUpload::builder()
                            .set_parts(Some(parts))
                            .build(),
                    )
                    .send()
                    .await
                    .map_err(|e| api_error("CompleteMultipartUpload", &e))?;
                Ok(())
            }
            Err(e) => {
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    tracing::warn!(
                        bucket,
                        key,
                        error = %api_error("AbortMultipartUpload", &abort_err),
                        "failed to abort multipart upload"
                    );
                }
                Err(e)
            }
        }
    }

    async fn upload_parts(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        body: &[u8],
    ) -> Result<Vec<CompletedPart>> {
        let mut parts = Vec::new();

        for (index, chunk) in body.chunks(PART_SIZE).enumerate() {
            // Part numbers are 1-based
            let part_number = (index + 1) as i32;

            let part = self
                .client
                .upload_part()
                .bucket(bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(chunk.to_vec()))
                .send()
                .await
                .map_err(|e| api_error("UploadPart", &e))?;

            parts.push(
                CompletedPart::builder()
                    .set_e_tag(part.e_tag().map(str::to_string))
                    .part_number(part_number)
                    .build(),
            );
        }

        Ok(parts)
    }
}

/// us-east-1 is the one region S3 rejects an explicit constraint for
fn needs_location_constraint(region: &str) -> bool {
    region != "us-east-1"
}

#[async_trait]
impl StorageProvider for S3Storage {
    fn name(&self) -> &str {
        "aws-s3"
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| api_error("ListBuckets", &e))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn create_bucket(&self, name: &str) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(name);

        if needs_location_constraint(&self.region) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        match request.send().await {
            Ok(_) => Ok(()),
            Err(e) => {
                if let Some(service_err) = e.as_service_error() {
                    if service_err.is_bucket_already_owned_by_you()
                        || service_err.is_bucket_already_exists()
                    {
                        return Err(CloudError::ResourceAlreadyExists(name.to_string()));
                    }
                }
                Err(api_error("CreateBucket", &e))
            }
        }
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        if body.len() >= MULTIPART_THRESHOLD {
            return self.multipart_upload(bucket, key, body).await;
        }

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| api_error("PutObject", &e))?;

        Ok(())
    }
}
