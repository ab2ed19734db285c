mod api;
pub mod models;

pub use api::{response_to_caption, send_caption_request};

use anyhow::Result;
use async_trait::async_trait;
use image::RgbImage;
use reqwest::Client;

use crate::traits::Captioner;
use crate::types::ModelClient;

/// BLIP captioning through the hosted inference API.
pub struct HuggingFaceCaptioner {
    client: ModelClient,
    http: Client,
}

impl HuggingFaceCaptioner {
    pub fn new(client: ModelClient) -> Self {
        Self {
            client,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Captioner for HuggingFaceCaptioner {
    async fn caption(&self, image: &RgbImage) -> Result<String> {
        send_caption_request(&self.http, &self.client, image).await
    }
}
