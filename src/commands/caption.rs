use std::path::Path;

use tokio::fs;

use crate::config::Layout;
use crate::constants::TEXT_EXTENSION;
use crate::context::CaptionContext;
use crate::errors::{PipelineError, Result};
use crate::fs_utils::{
    ensure_dir, file_key, has_extension, is_image_file, list_dir_files, read_optional_text_file,
    read_text_file, write_text_file,
};
use crate::models::{CaptionOutcome, FusionReport, FusionStage};

/// `"{caption}. {user_text}"` with surrounding whitespace removed.
pub fn fuse_text(caption: &str, user_text: &str) -> String {
    format!("{caption}. {user_text}").trim().to_string()
}

/// Captions every image under `images/`, then fuses each caption with the
/// matching `user_prompts/<key>.txt` into `prompts/<key>.txt`.
///
/// A failure on one image is recorded and the batch moves on.
pub async fn caption_and_fuse(ctx: &CaptionContext, layout: &Layout) -> Result<FusionReport> {
    ensure_dir(&layout.captions_dir()).await?;
    ensure_dir(&layout.prompts_dir()).await?;

    let files = list_dir_files(&layout.images_dir()).await?;
    tracing::info!(count = files.len(), dir = %layout.images_dir().display(), "found files");

    let mut report = FusionReport::default();
    for path in files {
        if !is_image_file(&path) {
            tracing::info!(file = %path.display(), "skipping non-image file");
            report.skipped_non_images += 1;
            continue;
        }
        let Some(key) = file_key(&path) else {
            tracing::info!(file = %path.display(), "skipping file with a non UTF-8 name");
            report.skipped_non_images += 1;
            continue;
        };

        tracing::info!(key = %key, "processing image");
        let outcome = caption_image(ctx, &path, &key, layout).await;
        log_outcome(&key, &outcome);
        report.record(&outcome);
    }

    Ok(report)
}

/// Fusion only: pairs existing `captions/*.txt` with user prompts without
/// calling any model.
pub async fn fuse_text_prompts(layout: &Layout) -> Result<FusionReport> {
    ensure_dir(&layout.prompts_dir()).await?;

    let mut report = FusionReport::default();
    for path in list_dir_files(&layout.captions_dir()).await? {
        if !has_extension(&path, TEXT_EXTENSION) {
            continue;
        }
        let Some(key) = file_key(&path) else {
            tracing::warn!(file = %path.display(), "skipping caption file with a non UTF-8 name");
            continue;
        };

        let outcome = match read_text_file(&path).await {
            Ok(caption) => fuse_with_user_prompt(caption.trim(), &key, layout).await,
            Err(err) => CaptionOutcome::Failed {
                stage: FusionStage::ReadCaption,
                reason: err.to_string(),
            },
        };
        log_outcome(&key, &outcome);
        report.record(&outcome);
    }

    Ok(report)
}

async fn caption_image(
    ctx: &CaptionContext,
    path: &Path,
    key: &str,
    layout: &Layout,
) -> CaptionOutcome {
    let caption = {
        let image = match decode_rgb(path).await {
            Ok(image) => image,
            Err(err) => {
                return CaptionOutcome::Failed {
                    stage: FusionStage::Decode,
                    reason: err.to_string(),
                }
            }
        };

        match ctx.captioner.caption(&image).await {
            Ok(caption) => caption,
            Err(err) => {
                return CaptionOutcome::Failed {
                    stage: FusionStage::Caption,
                    reason: format!("{err:#}"),
                }
            }
        }
    };
    tracing::info!(key, caption = %caption, "captioned");

    let caption_path = layout.captions_dir().join(format!("{key}.{TEXT_EXTENSION}"));
    if let Err(err) = write_text_file(&caption_path, &caption).await {
        return CaptionOutcome::Failed {
            stage: FusionStage::WriteCaption,
            reason: err.to_string(),
        };
    }

    fuse_with_user_prompt(&caption, key, layout).await
}

async fn decode_rgb(path: &Path) -> Result<image::RgbImage> {
    let bytes = fs::read(path)
        .await
        .map_err(|err| PipelineError::io(path, err))?;
    let image = image::load_from_memory(&bytes).map_err(|source| PipelineError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgb8())
}

async fn fuse_with_user_prompt(caption: &str, key: &str, layout: &Layout) -> CaptionOutcome {
    let file_name = format!("{key}.{TEXT_EXTENSION}");

    let user_text = match read_optional_text_file(&layout.user_prompts_dir().join(&file_name)).await
    {
        Ok(text) => text,
        Err(err) => {
            return CaptionOutcome::Failed {
                stage: FusionStage::ReadUserPrompt,
                reason: err.to_string(),
            }
        }
    };
    if user_text.is_none() {
        tracing::warn!(key, "no user prompt found, using caption only");
    }

    let fused = fuse_text(caption, user_text.as_deref().map(str::trim).unwrap_or(""));
    let output_path = layout.prompts_dir().join(&file_name);
    if let Err(err) = write_text_file(&output_path, &fused).await {
        return CaptionOutcome::Failed {
            stage: FusionStage::WritePrompt,
            reason: err.to_string(),
        };
    }
    tracing::debug!(key, path = %output_path.display(), "saved fused prompt");

    if user_text.is_some() {
        CaptionOutcome::Fused
    } else {
        CaptionOutcome::CaptionOnly
    }
}

fn log_outcome(key: &str, outcome: &CaptionOutcome) {
    match outcome {
        CaptionOutcome::Fused | CaptionOutcome::CaptionOnly => {
            tracing::info!(key, "final prompt saved")
        }
        CaptionOutcome::Failed { stage, reason } => {
            tracing::error!(key, stage = %stage, error = %reason, "skipping fusion")
        }
    }
}
