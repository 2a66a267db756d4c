//! Mapping from AWS SDK errors to `CloudError`

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use skylift_cloud::CloudError;

/// Wrap an SDK error as an API error, naming the operation that failed
pub(crate) fn api_error<E, R>(operation: &str, err: &SdkError<E, R>) -> CloudError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    CloudError::ApiError(format!("{operation}: {}", DisplayErrorContext(err)))
}

/// Extract the service error code, when the failure reached the service
pub(crate) fn error_code<E, R>(err: &SdkError<E, R>) -> Option<&str>
where
    E: ProvideErrorMetadata,
{
    err.as_service_error().and_then(|e| e.code())
}
