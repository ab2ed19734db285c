use std::path::Path;
use std::time::Instant;

use crate::commands::generate::generate_mesh;
use crate::commands::prompts::read_prompts_from_dir;
use crate::config::Layout;
use crate::context::MeshContext;
use crate::errors::Result;
use crate::fs_utils::{artifact_complete, ensure_dir};
use crate::models::{ItemOutcome, MeshArtifacts, PromptEntry, RunSummary};

/// Generates meshes for every prompt under `prompts/`, one at a time.
///
/// Returns `None` when there is nothing to do; no model is contacted in that
/// case. Keys whose PLY and OBJ already exist are skipped, so an interrupted
/// run resumes where it stopped.
pub async fn run_mesh_batch(ctx: &MeshContext, layout: &Layout) -> Result<Option<RunSummary>> {
    let output_dir = ensure_dir(&layout.output_dir()).await?;

    let prompts = read_prompts_from_dir(&layout.prompts_dir()).await?;
    if prompts.is_empty() {
        tracing::warn!(dir = %layout.prompts_dir().display(), "no prompt files found");
        return Ok(None);
    }

    let total = prompts.len();
    tracing::info!(total, "generating 3D models");

    let mut summary = RunSummary::default();
    for (index, entry) in prompts.iter().enumerate() {
        let outcome = process_prompt(ctx, entry, &output_dir).await;
        match &outcome {
            ItemOutcome::Generated { elapsed } => tracing::info!(
                key = %entry.key,
                index = index + 1,
                total,
                elapsed_secs = elapsed.as_secs_f64(),
                "generated"
            ),
            ItemOutcome::Skipped => tracing::info!(
                key = %entry.key,
                index = index + 1,
                total,
                "skipping, already generated"
            ),
            ItemOutcome::Failed { reason } => tracing::error!(
                key = %entry.key,
                index = index + 1,
                total,
                error = %reason,
                "generation failed"
            ),
        }
        summary.record(&outcome);
    }

    log_summary(&summary);
    Ok(Some(summary))
}

/// Everything allocated for one prompt lives inside this call and is dropped
/// before the loop moves on.
async fn process_prompt(ctx: &MeshContext, entry: &PromptEntry, output_dir: &Path) -> ItemOutcome {
    let artifacts = MeshArtifacts::for_key(output_dir, &entry.key, 0);
    if artifact_complete(&artifacts.ply, ctx.min_artifact_bytes).await
        && artifact_complete(&artifacts.obj, ctx.min_artifact_bytes).await
    {
        return ItemOutcome::Skipped;
    }

    tracing::info!(key = %entry.key, prompt = %entry.text, "generating");
    let start = Instant::now();
    match generate_mesh(ctx, &entry.text, &entry.key, output_dir).await {
        Ok(_) => ItemOutcome::Generated {
            elapsed: start.elapsed(),
        },
        Err(err) => ItemOutcome::Failed {
            reason: err.to_string(),
        },
    }
}

pub fn log_summary(summary: &RunSummary) {
    let total_secs = summary.total_time.as_secs_f64();
    match summary.average_time() {
        Some(average) => tracing::info!(
            success_count = summary.success_count,
            fail_count = summary.fail_count,
            skipped_count = summary.skipped_count,
            total_secs,
            average_secs = average.as_secs_f64(),
            "experiment summary"
        ),
        None => tracing::info!(
            success_count = summary.success_count,
            fail_count = summary.fail_count,
            skipped_count = summary.skipped_count,
            total_secs,
            "experiment summary"
        ),
    }
}
