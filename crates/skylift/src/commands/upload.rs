use anyhow::Context;
use colored::Colorize;
use skylift_cloud::{ensure_bucket, upload_file};
use skylift_cloud_aws::S3Storage;
use std::path::Path;

/// Ensure the bucket exists, then upload one local file into it
pub async fn handle(
    region: &str,
    bucket: &str,
    file: &Path,
    key: Option<String>,
) -> anyhow::Result<()> {
    tracing::info!(region, bucket, file = %file.display(), "uploading to bucket");

    let storage = S3Storage::connect(region)
        .await
        .context("failed to build S3 client")?;
    println!("{}", "✓ S3 client ready".green());

    let created = ensure_bucket(&storage, bucket)
        .await
        .with_context(|| format!("failed to ensure bucket '{bucket}'"))?;
    if created {
        println!("{}", format!("✓ bucket created: {bucket}").green());
    } else {
        println!("{}", format!("✓ bucket exists: {bucket}").green());
    }

    let key = match key {
        Some(key) => key,
        None => file
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow::anyhow!("cannot derive an object key from '{}'", file.display())
            })?,
    };

    let size = upload_file(&storage, bucket, &key, file)
        .await
        .context("upload failed")?;

    println!(
        "{}",
        format!("✓ uploaded {} bytes to s3://{bucket}/{key}", size)
            .green()
            .bold()
    );

    Ok(())
}
