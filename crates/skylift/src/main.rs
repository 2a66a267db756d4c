mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skylift")]
#[command(about = "Bootstrap AWS compute and storage from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ensure a keypair exists, resolve a base image, launch one instance
    Instance {
        /// AWS region to operate in
        #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
        region: String,
        /// Keypair name to ensure before launching
        #[arg(long, env = "SKYLIFT_KEYPAIR", default_value = "skylift-deploy")]
        keypair: String,
        /// Image name pattern (provider-side glob)
        #[arg(
            long,
            default_value = "ubuntu/images/hvm-ssd/ubuntu-focal-20.04-amd64-server-*"
        )]
        image_filter: String,
        /// Virtualization type the image lookup filters on
        #[arg(long, default_value = "hvm")]
        virtualization: String,
        /// Owner account the image lookup is scoped to (default: Canonical)
        #[arg(long, default_value = "099720109477")]
        image_owner: String,
        /// Instance size class
        #[arg(long, default_value = "t3.micro")]
        instance_type: String,
    },
    /// Ensure a bucket exists and upload a local file into it
    Upload {
        /// AWS region to operate in
        #[arg(long, env = "AWS_REGION", default_value = "us-east-1")]
        region: String,
        /// Bucket to ensure and upload into
        #[arg(long, env = "SKYLIFT_BUCKET")]
        bucket: String,
        /// Local file to upload
        #[arg(long)]
        file: PathBuf,
        /// Object key (defaults to the file name)
        #[arg(long)]
        key: Option<String>,
    },
    /// Print version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is reserved for result lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Instance {
            region,
            keypair,
            image_filter,
            virtualization,
            image_owner,
            instance_type,
        } => {
            commands::instance::handle(
                &region,
                keypair,
                image_filter,
                virtualization,
                image_owner,
                instance_type,
            )
            .await?;
        }
        Commands::Upload {
            region,
            bucket,
            file,
            key,
        } => {
            commands::upload::handle(&region, &bucket, &file, key).await?;
        }
        Commands::Version => {
            println!("skylift {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
