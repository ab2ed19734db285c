//! In-process stand-ins for the model collaborators.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use image::RgbImage;
use modelapi::{Captioner, Latent, LatentSampler, MeshDecoder, SamplingParams, TriMesh};

#[derive(Debug, Clone)]
pub struct SampleCall {
    pub batch_size: usize,
    pub texts: Vec<String>,
    pub params: SamplingParams,
}

/// Returns one fixed latent per batch slot, or fails for listed prompts.
#[derive(Clone, Default)]
pub struct MockSampler {
    pub calls: Arc<Mutex<Vec<SampleCall>>>,
    pub fail_on: HashSet<String>,
}

impl MockSampler {
    pub fn failing_on(prompts: &[&str]) -> Self {
        Self {
            fail_on: prompts.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn prompts_seen(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .flat_map(|call| call.texts.clone())
            .collect()
    }
}

#[async_trait]
impl LatentSampler for MockSampler {
    async fn sample_latents(
        &self,
        batch_size: usize,
        texts: &[String],
        params: &SamplingParams,
    ) -> Result<Vec<Latent>> {
        self.calls.lock().unwrap().push(SampleCall {
            batch_size,
            texts: texts.to_vec(),
            params: params.clone(),
        });

        if texts.iter().any(|text| self.fail_on.contains(text)) {
            return Err(anyhow!("sampler exploded"));
        }
        Ok((0..batch_size).map(|_| Latent(vec![0.25; 8])).collect())
    }
}

/// Decodes every latent into the same triangle.
#[derive(Clone, Default)]
pub struct MockDecoder {
    pub fail: bool,
}

#[async_trait]
impl MeshDecoder for MockDecoder {
    async fn decode_latent_mesh(&self, _latent: &Latent) -> Result<TriMesh> {
        if self.fail {
            return Err(anyhow!("decoder exploded"));
        }
        Ok(TriMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2]],
        ))
    }
}

/// Captions by the color of the top-left pixel; pure red images fail.
#[derive(Clone, Default)]
pub struct MockCaptioner {
    pub calls: Arc<Mutex<usize>>,
}

impl MockCaptioner {
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Captioner for MockCaptioner {
    async fn caption(&self, image: &RgbImage) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        match image.get_pixel(0, 0).0 {
            [255, 0, 0] => Err(anyhow!("captioner exploded")),
            [0, 0, 255] => Ok("A blue square".to_string()),
            _ => Ok("A cat".to_string()),
        }
    }
}

pub fn write_png(path: &std::path::Path, rgb: [u8; 3]) {
    RgbImage::from_pixel(4, 4, image::Rgb(rgb))
        .save(path)
        .expect("Failed to write test image");
}
