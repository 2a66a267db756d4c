use anyhow::Context;
use colored::Colorize;
use skylift_cloud::{ImageQuery, InstanceRequest, provision_instance};
use skylift_cloud_aws::Ec2Compute;

/// Launch one instance, creating the keypair first when it is missing
///
/// Progress goes to the log on stderr; the single stdout line carries the
/// launched instance's ID.
pub async fn handle(
    region: &str,
    keypair: String,
    image_filter: String,
    virtualization: String,
    image_owner: String,
    instance_type: String,
) -> anyhow::Result<()> {
    tracing::info!(region, keypair, instance_type, "provisioning instance");

    let compute = Ec2Compute::connect(region)
        .await
        .context("failed to build EC2 client")?;

    let request = InstanceRequest {
        keypair,
        image: ImageQuery {
            name_pattern: image_filter,
            virtualization,
            owner: image_owner,
        },
        instance_type,
    };

    let instance = provision_instance(&compute, &request)
        .await
        .context("instance provisioning failed")?;

    println!(
        "{}",
        format!("✓ instance launched: {}", instance.id).green().bold()
    );

    Ok(())
}
