//! AWS provider for Skylift
//!
//! Implements the `ComputeProvider` trait over EC2 and the
//! `StorageProvider` trait over S3, using the official AWS SDK for Rust.
//!
//! # Requirements
//!
//! - Credentials come from the SDK's ambient discovery chain (environment,
//!   shared config files, IMDS); nothing is read by this crate directly.
//! - The region is always passed explicitly by the caller.
//!
//! # Example
//!
//! ```ignore
//! use skylift_cloud::ComputeProvider;
//! use skylift_cloud_aws::Ec2Compute;
//!
//! let compute = Ec2Compute::connect("us-east-1").await?;
//! let exists = compute.keypair_exists("deploy-key").await?;
//! ```

pub mod config;
pub mod ec2;
mod error;
pub mod s3;

pub use config::sdk_config;
pub use ec2::Ec2Compute;
pub use s3::S3Storage;
