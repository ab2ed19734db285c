use serde::{Deserialize, Serialize};

use crate::types::SamplingParams;

#[derive(Debug, Serialize)]
pub struct CaptionRequest<'a> {
    pub model: &'a str,
    pub device: &'a str,
    pub image_b64: String,
}

#[derive(Debug, Deserialize)]
pub struct CaptionResponse {
    pub caption: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SampleLatentsRequest<'a> {
    pub model: &'a str,
    pub device: &'a str,
    pub batch_size: usize,
    pub texts: &'a [String],
    #[serde(flatten)]
    pub params: &'a SamplingParams,
}

#[derive(Debug, Deserialize)]
pub struct SampleLatentsResponse {
    #[serde(default)]
    pub latents: Vec<Vec<f32>>,
}

#[derive(Debug, Serialize)]
pub struct DecodeMeshRequest<'a> {
    pub model: &'a str,
    pub device: &'a str,
    pub latent: &'a [f32],
}

#[derive(Debug, Deserialize)]
pub struct DecodeMeshResponse {
    pub verts: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
    pub vertex_channels: Option<VertexChannels>,
}

/// Per-vertex color channels keyed the way the decoder names them.
#[derive(Debug, Deserialize)]
pub struct VertexChannels {
    #[serde(rename = "R")]
    pub r: Vec<f32>,
    #[serde(rename = "G")]
    pub g: Vec<f32>,
    #[serde(rename = "B")]
    pub b: Vec<f32>,
}
