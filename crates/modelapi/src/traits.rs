use anyhow::Result;
use async_trait::async_trait;
use image::RgbImage;

use crate::mesh::TriMesh;
use crate::types::{Latent, SamplingParams};

/// Produces a one-line caption for a decoded RGB image.
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &RgbImage) -> Result<String>;
}

/// Text-conditioned diffusion sampler. Returns one latent per batch slot.
#[async_trait]
pub trait LatentSampler: Send + Sync {
    async fn sample_latents(
        &self,
        batch_size: usize,
        texts: &[String],
        params: &SamplingParams,
    ) -> Result<Vec<Latent>>;
}

/// Decodes a latent into a triangle mesh.
#[async_trait]
pub trait MeshDecoder: Send + Sync {
    async fn decode_latent_mesh(&self, latent: &Latent) -> Result<TriMesh>;
}
