//! prompt2mesh - caption images, fuse prompts, and turn prompts into meshes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use prompt2mesh_lib::{
    CaptionContext, Layout, MeshContext, PipelineConfig, caption_and_fuse, fuse_text_prompts,
    run_mesh_batch, write_charts,
};

#[derive(Parser)]
#[command(name = "prompt2mesh")]
#[command(about = "Batch text-to-3D pipeline")]
#[command(version)]
struct Cli {
    /// Directory holding prompts/, outputs/, images/, user_prompts/ and captions/
    #[arg(long, global = true, default_value = ".")]
    base_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a PLY/OBJ pair for every prompt in prompts/
    Mesh,
    /// Caption images/ and fuse each caption with its user prompt into prompts/
    Caption,
    /// Fuse existing captions/ with user prompts without captioning
    Fuse,
    /// Render the benchmark charts into charts/
    Charts,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let layout = Layout::new(cli.base_dir);

    match cli.command {
        Commands::Mesh => {
            let config = PipelineConfig::load(&layout.config_file())?;
            let ctx = MeshContext::init(&config).context("Failed to set up mesh models")?;
            run_mesh_batch(&ctx, &layout).await?;
        }
        Commands::Caption => {
            let config = PipelineConfig::load(&layout.config_file())?;
            let ctx = CaptionContext::init(&config).context("Failed to set up captioning model")?;
            let report = caption_and_fuse(&ctx, &layout).await?;
            tracing::info!(
                fused = report.fused,
                caption_only = report.caption_only,
                failed = report.failed,
                skipped = report.skipped_non_images,
                "all done"
            );
        }
        Commands::Fuse => {
            let report = fuse_text_prompts(&layout).await?;
            tracing::info!(
                fused = report.fused,
                caption_only = report.caption_only,
                failed = report.failed,
                "all done"
            );
        }
        Commands::Charts => {
            write_charts(&layout).await?;
        }
    }

    Ok(())
}
