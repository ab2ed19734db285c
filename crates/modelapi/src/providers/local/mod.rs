mod api;
pub mod models;

pub use api::{
    response_to_latents, response_to_mesh, send_caption_request, send_decode_request,
    send_sample_request,
};

use anyhow::Result;
use async_trait::async_trait;
use image::RgbImage;
use reqwest::Client;

use crate::mesh::TriMesh;
use crate::traits::{Captioner, LatentSampler, MeshDecoder};
use crate::types::{Latent, ModelClient, SamplingParams};
use crate::utils::encode_image_to_base64;

/// Captioning model hosted by the local inference server.
pub struct LocalCaptioner {
    client: ModelClient,
    http: Client,
}

impl LocalCaptioner {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Captioner for LocalCaptioner {
    async fn caption(&self, image: &RgbImage) -> Result<String> {
        let image_b64 = encode_image_to_base64(image)?;
        send_caption_request(&self.http, &self.client, image_b64).await
    }
}

/// Text-conditioned prior (e.g. `text300M`) on the local inference server.
pub struct LocalLatentSampler {
    client: ModelClient,
    http: Client,
}

impl LocalLatentSampler {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl LatentSampler for LocalLatentSampler {
    async fn sample_latents(
        &self,
        batch_size: usize,
        texts: &[String],
        params: &SamplingParams,
    ) -> Result<Vec<Latent>> {
        send_sample_request(&self.http, &self.client, batch_size, texts, params).await
    }
}

/// Latent-to-mesh transmitter on the local inference server.
pub struct LocalMeshDecoder {
    client: ModelClient,
    http: Client,
}

impl LocalMeshDecoder {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl MeshDecoder for LocalMeshDecoder {
    async fn decode_latent_mesh(&self, latent: &Latent) -> Result<TriMesh> {
        send_decode_request(&self.http, &self.client, latent).await
    }
}
