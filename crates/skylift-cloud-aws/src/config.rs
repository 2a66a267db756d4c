//! Shared SDK configuration loading

use aws_config::{BehaviorVersion, Region, SdkConfig};
use skylift_cloud::{CloudError, Result};

/// Load SDK configuration for the given region
///
/// Credentials, profiles and endpoints come from the SDK's default
/// discovery chain; only the region is pinned here. The loader itself is
/// lazy about credentials, so an invalid region string is the only
/// configuration error caught at this point.
pub async fn sdk_config(region: &str) -> Result<SdkConfig> {
    if region.trim().is_empty() {
        return Err(CloudError::InvalidConfig(
            "region must not be empty".to_string(),
        ));
    }

    Ok(aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await)
}
