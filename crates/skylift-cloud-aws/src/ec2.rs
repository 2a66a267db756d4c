//! EC2 implementation of the compute provider

use crate::error::{api_error, error_code};
use async_trait::async_trait;
use aws_sdk_ec2::types::{Filter, InstanceType};
use skylift_cloud::{
    CloudError, ComputeProvider, Image, ImageQuery, Instance, KeyPair, LaunchSpec, Result,
};

/// EC2-backed compute provider
pub struct Ec2Compute {
    client: aws_sdk_ec2::Client,
}

impl Ec2Compute {
    /// Build a client from ambient credentials and an explicit region
    pub async fn connect(region: &str) -> Result<Self> {
        let config = crate::config::sdk_config(region).await?;
        tracing::debug!(region, "EC2 client ready");
        Ok(Self {
            client: aws_sdk_ec2::Client::new(&config),
        })
    }

    /// Wrap an existing SDK client (custom endpoints, test stacks)
    pub fn from_client(client: aws_sdk_ec2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ComputeProvider for Ec2Compute {
    fn name(&self) -> &str {
        "aws-ec2"
    }

    async fn keypair_exists(&self, name: &str) -> Result<bool> {
        match self.client.describe_key_pairs().key_names(name).send().await {
            Ok(output) => Ok(!output.key_pairs().is_empty()),
            // Absence comes back as a service error, not an empty list
            Err(ref e) if error_code(e) == Some("InvalidKeyPair.NotFound") => Ok(false),
            Err(e) => Err(api_error("DescribeKeyPairs", &e)),
        }
    }

    async fn create_keypair(&self, name: &str) -> Result<KeyPair> {
        let output = self
            .client
            .create_key_pair()
            .key_name(name)
            .send()
            .await
            .map_err(|e| match error_code(&e) {
                Some("InvalidKeyPair.Duplicate") => {
                    CloudError::ResourceAlreadyExists(name.to_string())
                }
                _ => api_error("CreateKeyPair", &e),
            })?;

        Ok(KeyPair {
            name: output.key_name().unwrap_or(name).to_string(),
            fingerprint: output.key_fingerprint().map(str::to_string),
        })
    }

    async fn find_images(&self, query: &ImageQuery) -> Result<Vec<Image>> {
        let output = self
            .client
            .describe_images()
            .filters(
                Filter::builder()
                    .name("name")
                    .values(&query.name_pattern)
                    .build(),
            )
            .filters(
                Filter::builder()
                    .name("virtualization-type")
                    .values(&query.virtualization)
                    .build(),
            )
            .owners(&query.owner)
            .send()
            .await
            .map_err(|e| api_error("DescribeImages", &e))?;

        Ok(output
            .images()
            .iter()
            .filter_map(|image| {
                image.image_id().map(|id| Image {
                    id: id.to_string(),
                    name: image.name().map(str::to_string),
                })
            })
            .collect())
    }

    async fn run_instances(&self, spec: &LaunchSpec) -> Result<Vec<Instance>> {
        let output = self
            .client
            .run_instances()
            .image_id(&spec.image_id)
            .key_name(&spec.key_name)
            .instance_type(InstanceType::from(spec.instance_type.as_str()))
            .min_count(spec.count)
            .max_count(spec.count)
            .send()
            .await
            .map_err(|e| api_error("RunInstances", &e))?;

        Ok(output
            .instances()
            .iter()
            .filter_map(|instance| {
                instance.instance_id().map(|id| Instance {
                    id: id.to_string(),
                    state: instance
                        .state()
                        .and_then(|s| s.name())
                        .map(|n| n.as_str().to_string()),
                })
            })
            .collect())
    }
}
