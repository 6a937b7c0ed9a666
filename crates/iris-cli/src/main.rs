//! IRIS CLI: drive the image workflow directly, without the HTTP server.
//!
//! Reads the same environment configuration as the server (`.env` included).

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use iris_cli::{
    guess_content_type, init_tracing, print_analysis, print_image, print_images_table,
    print_json, print_stats, OutputFormat,
};
use iris_core::Config;
use iris_services::{build_workflow, UploadedFile};
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "iris", about = "IRIS image analysis CLI")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload an image file
    Upload {
        /// Path to the image
        file: PathBuf,
        /// Override the content type guessed from the extension
        #[arg(long)]
        content_type: Option<String>,
    },
    /// Create an image record and print a presigned PUT URL for it
    Presign {
        /// Name recorded for the image (default: upload.jpg)
        filename: Option<String>,
        /// Content type the upload must use (default: image/jpeg)
        #[arg(long)]
        content_type: Option<String>,
    },
    /// List all images, newest first
    List,
    /// Show one image
    Get {
        /// Image ID
        id: String,
    },
    /// Run label, face and text detection on an image
    Analyze {
        /// Image ID
        id: String,
    },
    /// Show the stored analysis of an image
    Analysis {
        /// Image ID
        id: String,
    },
    /// Delete an image, its stored object and its analysis
    Delete {
        /// Image ID
        id: String,
    },
    /// Aggregate counters
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    let workflow = build_workflow(&config).await?;

    let as_json = cli.format == OutputFormat::Json;

    match cli.command {
        Commands::Upload { file, content_type } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let content_type =
                content_type.unwrap_or_else(|| guess_content_type(&file).to_string());

            let image = workflow
                .upload(UploadedFile {
                    filename,
                    content_type,
                    data: Bytes::from(data),
                })
                .await?;
            if as_json {
                print_json(&image)?;
            } else {
                print_image(&image);
            }
        }
        Commands::Presign {
            filename,
            content_type,
        } => {
            let presigned = workflow.presign(filename, content_type).await?;
            let content_type = presigned.image.mime_type.clone().unwrap_or_default();
            if as_json {
                print_json(&json!({
                    "uploadUrl": presigned.upload_url,
                    "contentType": content_type,
                    "image": presigned.image,
                }))?;
            } else {
                print_image(&presigned.image);
                println!("\nUpload URL (PUT, expires in {}s):", config.presign_expiry().as_secs());
                println!("{}", presigned.upload_url);
                println!("Send with header: Content-Type: {}", content_type);
            }
        }
        Commands::List => {
            let images = workflow.list_images().await?;
            if as_json {
                print_json(&images)?;
            } else {
                print_images_table(&images);
            }
        }
        Commands::Get { id } => {
            let image = workflow.get_image(&id).await?;
            if as_json {
                print_json(&image)?;
            } else {
                print_image(&image);
            }
        }
        Commands::Analyze { id } => {
            let analysis = workflow.analyze(&id).await?;
            if as_json {
                print_json(&analysis)?;
            } else {
                print_analysis(&analysis);
            }
        }
        Commands::Analysis { id } => {
            let analysis = workflow.get_analysis(&id).await?;
            if as_json {
                print_json(&analysis)?;
            } else {
                print_analysis(&analysis);
            }
        }
        Commands::Delete { id } => {
            workflow.delete_image(&id).await?;
            if as_json {
                print_json(&json!({ "success": true, "id": id }))?;
            } else {
                println!("Image {} deleted", id);
            }
        }
        Commands::Stats => {
            let stats = workflow.stats().await?;
            if as_json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }
    }

    Ok(())
}
