use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{OBJ_EXTENSION, PLY_EXTENSION};

/// One prompt file: its trimmed text and the base filename it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEntry {
    pub key: String,
    pub text: String,
}

/// The two sibling files written for one latent of one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshArtifacts {
    pub ply: PathBuf,
    pub obj: PathBuf,
}

impl MeshArtifacts {
    pub fn for_key(output_dir: &Path, key: &str, index: usize) -> Self {
        Self {
            ply: output_dir.join(format!("{key}_{index}.{PLY_EXTENSION}")),
            obj: output_dir.join(format!("{key}_{index}.{OBJ_EXTENSION}")),
        }
    }
}

/// Result of one pass through the mesh batch loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Generated { elapsed: Duration },
    Skipped,
    Failed { reason: String },
}

/// Aggregate of one batch invocation. Lives only as long as the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub success_count: usize,
    pub fail_count: usize,
    pub skipped_count: usize,
    pub total_time: Duration,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Generated { elapsed } => {
                self.success_count += 1;
                self.total_time += *elapsed;
            }
            ItemOutcome::Skipped => self.skipped_count += 1,
            ItemOutcome::Failed { .. } => self.fail_count += 1,
        }
    }

    /// `None` until at least one item succeeded.
    pub fn average_time(&self) -> Option<Duration> {
        if self.success_count == 0 {
            return None;
        }
        Some(self.total_time / self.success_count as u32)
    }
}

/// Step of the captioning path an image failed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionStage {
    Decode,
    Caption,
    WriteCaption,
    ReadCaption,
    ReadUserPrompt,
    WritePrompt,
}

impl std::fmt::Display for FusionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FusionStage::Decode => "decode image",
            FusionStage::Caption => "caption",
            FusionStage::WriteCaption => "write caption",
            FusionStage::ReadCaption => "read caption",
            FusionStage::ReadUserPrompt => "read user prompt",
            FusionStage::WritePrompt => "write prompt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionOutcome {
    /// Caption and user text were both present.
    Fused,
    /// No user prompt file; the fused prompt is the caption alone.
    CaptionOnly,
    Failed { stage: FusionStage, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FusionReport {
    pub fused: usize,
    pub caption_only: usize,
    pub failed: usize,
    pub skipped_non_images: usize,
}

impl FusionReport {
    pub fn record(&mut self, outcome: &CaptionOutcome) {
        match outcome {
            CaptionOutcome::Fused => self.fused += 1,
            CaptionOutcome::CaptionOnly => self.caption_only += 1,
            CaptionOutcome::Failed { .. } => self.failed += 1,
        }
    }
}
