pub mod commands;
pub mod config;
pub mod constants;
pub mod context;
pub mod errors;
pub mod fs_utils;
pub mod models;

pub use commands::batch::{log_summary, run_mesh_batch};
pub use commands::caption::{caption_and_fuse, fuse_text, fuse_text_prompts};
pub use commands::charts::{
    BarChart, LineChart, generation_results_chart, generation_time_chart, render_bar_chart,
    render_line_chart, write_charts,
};
pub use commands::generate::generate_mesh;
pub use commands::prompts::read_prompts_from_dir;

pub use config::{Layout, PipelineConfig};
pub use context::{CaptionContext, MeshContext};
pub use errors::{PipelineError, Result};

pub use models::{
    CaptionOutcome, FusionReport, FusionStage, ItemOutcome, MeshArtifacts, PromptEntry,
    RunSummary,
};
