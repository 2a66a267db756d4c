//! Instance provisioning workflow
//!
//! Linear sequence: ensure the keypair exists, resolve a base image, launch
//! exactly one instance. Each step is awaited before the next; any failure
//! ends the run without rollback.

use crate::compute::{ComputeProvider, Image, ImageQuery, Instance, LaunchSpec};
use crate::error::{CloudError, Result};

/// Everything the provisioning workflow needs for one run
#[derive(Debug, Clone)]
pub struct InstanceRequest {
    pub keypair: String,
    pub image: ImageQuery,
    pub instance_type: String,
}

/// Ensure a keypair with the given name exists, creating it when absent
///
/// A create that loses the check-then-create race and comes back with
/// "already exists" counts as success.
pub async fn ensure_keypair<C: ComputeProvider + ?Sized>(compute: &C, name: &str) -> Result<()> {
    if compute.keypair_exists(name).await? {
        tracing::debug!(provider = compute.name(), keypair = name, "keypair already exists");
        return Ok(());
    }

    match compute.create_keypair(name).await {
        Ok(key) => {
            tracing::debug!(
                keypair = key.name,
                fingerprint = key.fingerprint.as_deref().unwrap_or("-"),
                "keypair created"
            );
            Ok(())
        }
        Err(CloudError::ResourceAlreadyExists(_)) => {
            tracing::debug!(keypair = name, "keypair appeared concurrently");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Resolve a base image by filter, taking the first match
///
/// No recency or version tie-break is applied; provider order decides.
pub async fn resolve_image<C: ComputeProvider + ?Sized>(
    compute: &C,
    query: &ImageQuery,
) -> Result<Image> {
    let images = compute.find_images(query).await?;
    tracing::debug!(pattern = query.name_pattern, matches = images.len(), "image lookup");

    images
        .into_iter()
        .next()
        .ok_or_else(|| CloudError::NoImageMatched(query.name_pattern.clone()))
}

/// Run the full provisioning sequence and return the launched instance
pub async fn provision_instance<C: ComputeProvider + ?Sized>(
    compute: &C,
    request: &InstanceRequest,
) -> Result<Instance> {
    ensure_keypair(compute, &request.keypair).await?;

    let image = resolve_image(compute, &request.image).await?;
    tracing::info!(image = image.id, "launching instance");

    let spec = LaunchSpec {
        image_id: image.id,
        key_name: request.keypair.clone(),
        instance_type: request.instance_type.clone(),
        count: 1,
    };

    let instances = compute.run_instances(&spec).await?;
    instances.into_iter().next().ok_or(CloudError::EmptyLaunch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::KeyPair;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every provider call so tests can assert on call order
    struct MockCompute {
        keypair_present: bool,
        create_keypair_result: Option<CloudError>,
        images: Vec<Image>,
        launched: Vec<Instance>,
        calls: Mutex<Vec<String>>,
    }

    impl MockCompute {
        fn new() -> Self {
            Self {
                keypair_present: false,
                create_keypair_result: None,
                images: vec![Image {
                    id: "ami-0001".to_string(),
                    name: Some("ubuntu-jammy".to_string()),
                }],
                launched: vec![Instance {
                    id: "i-abc123".to_string(),
                    state: Some("pending".to_string()),
                }],
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
    impl ComputeProvider for MockCompute {
        fn name(&self) -> &str {
            "mock"
        }

        async fn keypair_exists(&self, name: &str) -> Result<bool> {
            self.record(format!("keypair_exists:{name}"));
            Ok(self.keypair_present)
        }

        async fn create_keypair(&self, name: &str) -> Result<KeyPair> {
            self.record(format!("create_keypair:{name}"));
            if let Some(err) = &self.create_keypair_result {
                return Err(match err {
                    CloudError::ResourceAlreadyExists(s) => {
                        CloudError::ResourceAlreadyExists(s.clone())
                    }
                    other => CloudError::ApiError(other.to_string()),
                });
            }
            Ok(KeyPair {
                name: name.to_string(),
                fingerprint: Some("aa:bb:cc".to_string()),
            })
        }

        async fn find_images(&self, query: &ImageQuery) -> Result<Vec<Image>> {
            self.record(format!("find_images:{}", query.name_pattern));
            Ok(self.images.clone())
        }

        async fn run_instances(&self, spec: &LaunchSpec) -> Result<Vec<Instance>> {
            self.record(format!("run_instances:{}:{}", spec.image_id, spec.count));
            Ok(self.launched.clone())
        }
    }

    fn request() -> InstanceRequest {
        InstanceRequest {
            keypair: "deploy-key".to_string(),
            image: ImageQuery {
                name_pattern: "ubuntu/images/hvm-ssd/*".to_string(),
                virtualization: "hvm".to_string(),
                owner: "099720109477".to_string(),
            },
            instance_type: "t3.micro".to_string(),
        }
    }

    #[tokio::test]
    async fn missing_keypair_is_created_once_before_launch() {
        let compute = MockCompute::new();

        let instance = provision_instance(&compute, &request()).await.unwrap();
        assert_eq!(instance.id, "i-abc123");

        let calls = compute.calls();
        assert_eq!(
            calls,
            vec![
                "keypair_exists:deploy-key",
                "create_keypair:deploy-key",
                "find_images:ubuntu/images/hvm-ssd/*",
                "run_instances:ami-0001:1",
            ]
        );
    }

    #[tokio::test]
    async fn existing_keypair_is_not_recreated() {
        let mut compute = MockCompute::new();
        compute.keypair_present = true;

        provision_instance(&compute, &request()).await.unwrap();

        let calls = compute.calls();
        assert!(!calls.iter().any(|c| c.starts_with("create_keypair")));
    }

    #[tokio::test]
    async fn lost_create_race_counts_as_success() {
        let mut compute = MockCompute::new();
        compute.create_keypair_result =
            Some(CloudError::ResourceAlreadyExists("deploy-key".to_string()));

        provision_instance(&compute, &request()).await.unwrap();
    }

    #[tokio::test]
    async fn zero_image_matches_fails_without_launching() {
        let mut compute = MockCompute::new();
        compute.images = Vec::new();

        let err = provision_instance(&compute, &request()).await.unwrap_err();
        assert!(matches!(err, CloudError::NoImageMatched(_)));

        let calls = compute.calls();
        assert!(!calls.iter().any(|c| c.starts_with("run_instances")));
    }

    #[tokio::test]
    async fn first_matching_image_is_used() {
        let mut compute = MockCompute::new();
        compute.images = vec![
            Image {
                id: "ami-first".to_string(),
                name: None,
            },
            Image {
                id: "ami-second".to_string(),
                name: None,
            },
        ];

        provision_instance(&compute, &request()).await.unwrap();

        let calls = compute.calls();
        assert!(calls.contains(&"run_instances:ami-first:1".to_string()));
    }

    #[tokio::test]
    async fn empty_launch_result_is_an_error() {
        let mut compute = MockCompute::new();
        compute.launched = Vec::new();

        let err = provision_instance(&compute, &request()).await.unwrap_err();
        assert!(matches!(err, CloudError::EmptyLaunch));
    }
}
