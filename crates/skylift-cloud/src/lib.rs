//! Skylift Cloud Infrastructure
//!
//! This crate provides the provider abstraction for Skylift: traits for
//! compute and object storage backends, plus the linear bootstrap workflows
//! built on top of them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  Skylift CLI                     │
//! │            (skylift instance/upload)             │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               skylift-cloud                      │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │         Provider Abstraction              │   │
//! │  │  trait ComputeProvider { ... }            │   │
//! │  │  trait StorageProvider { ... }            │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │  provision   │  │    upload    │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────┬───────────────────────┘
//!         │                 │
//! ┌───────▼───────┐ ┌───────▼───────┐
//! │   EC2 / AMI   │ │      S3       │
//! │ (skylift-     │ │ (skylift-     │
//! │  cloud-aws)   │ │  cloud-aws)   │
//! └───────────────┘ └───────────────┘
//! ```
//!
//! The workflows are deliberately linear: check whether a resource exists,
//! create it when it does not, then perform the one operation the run is
//! for. Nothing is retried and nothing is rolled back; a failure at any step
//! ends the run and leaves earlier side effects in place.

pub mod compute;
pub mod error;
pub mod provision;
pub mod storage;
pub mod upload;

// Re-exports
pub use compute::{ComputeProvider, Image, ImageQuery, Instance, KeyPair, LaunchSpec};
pub use error::{CloudError, Result};
pub use provision::{InstanceRequest, ensure_keypair, provision_instance, resolve_image};
pub use storage::StorageProvider;
pub use upload::{ensure_bucket, upload_file};
