//! Compute provider trait definition

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Compute provider abstraction trait
///
/// Backends (EC2, mocks in tests) implement this trait to expose the four
/// primitive calls the provisioning workflow is built from. Implementations
/// map their own error types into [`crate::CloudError`]; in particular a
/// "keypair not found" service error must surface as `Ok(false)` from
/// [`ComputeProvider::keypair_exists`], not as an error.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    /// Returns the provider name (e.g., "aws-ec2")
    fn name(&self) -> &str;

    /// Check whether a keypair with the given name exists
    async fn keypair_exists(&self, name: &str) -> Result<bool>;

    /// Create a keypair with the given name
    async fn create_keypair(&self, name: &str) -> Result<KeyPair>;

    /// List machine images matching the query, in provider order
    async fn find_images(&self, query: &ImageQuery) -> Result<Vec<Image>>;

    /// Launch instances according to the spec and return them
    async fn run_instances(&self, spec: &LaunchSpec) -> Result<Vec<Instance>>;
}

/// A named asymmetric credential record held by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    pub name: String,

    /// Key fingerprint, when the provider returns one on creation
    pub fingerprint: Option<String>,
}

/// Filter for resolving a base machine image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageQuery {
    /// Image name pattern (provider-side glob, e.g. "ubuntu/images/...-*")
    pub name_pattern: String,

    /// Virtualization type filter (e.g. "hvm")
    pub virtualization: String,

    /// Owner/publisher account the catalog search is scoped to
    pub owner: String,
}

/// A machine image resolved from the provider catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub name: Option<String>,
}

/// Parameters for launching instances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub image_id: String,
    pub key_name: String,
    pub instance_type: String,

    /// Exact number of instances to launch (min and max)
    pub count: i32,
}

/// A launched compute instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,

    /// Instance state as reported at launch (e.g. "pending")
    pub state: Option<String>,
}
