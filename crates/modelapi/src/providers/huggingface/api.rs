use anyhow::{Context, Result, anyhow, bail};
use image::RgbImage;
use reqwest::Client;

use crate::types::ModelClient;
use crate::utils::{IMAGE_PNG, encode_png};

use super::models::{CaptionCandidate, HuggingFaceError};

pub async fn send_caption_request(
    http: &Client,
    api_client: &ModelClient,
    image: &RgbImage,
) -> Result<String> {
    let url = format!("{}/{}", api_client.endpoint(), api_client.model());
    let body = encode_png(image)?;

    tracing::debug!(%url, bytes = body.len(), "sending caption request");

    let mut request = http
        .post(&url)
        .header("Content-Type", IMAGE_PNG)
        .body(body);
    if let Some(key) = api_client.api_key() {
        request = request.bearer_auth(key);
    }

    let response = request.send().await.context("HTTP request failed")?;
    let status = response.status();
    let response_text = response
        .text()
        .await
        .context("Reading response body failed")?;

    if !status.is_success() {
        let reason = serde_json::from_str::<HuggingFaceError>(&response_text)
            .map(|err| err.error)
            .unwrap_or(response_text);
        bail!("Caption request returned {}: {}", status, reason);
    }

    let candidates: Vec<CaptionCandidate> = serde_json::from_str(&response_text)
        .with_context(|| {
            format!(
                "Failed to decode caption response JSON. Raw response: {}",
                response_text
            )
        })?;

    response_to_caption(candidates)
}

pub fn response_to_caption(candidates: Vec<CaptionCandidate>) -> Result<String> {
    candidates
        .into_iter()
        .filter_map(|candidate| candidate.generated_text)
        .map(|text| text.trim().to_string())
        .find(|text| !text.is_empty())
        .ok_or_else(|| anyhow!("Provider did not return a caption."))
}
