use anyhow::{Context, Result, anyhow, bail};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::mesh::TriMesh;
use crate::types::{Latent, ModelClient, SamplingParams};

use super::models::{
    CaptionRequest, CaptionResponse, DecodeMeshRequest, DecodeMeshResponse,
    SampleLatentsRequest, SampleLatentsResponse,
};

async fn post_json<B: Serialize, R: DeserializeOwned>(
    http: &Client,
    api_client: &ModelClient,
    route: &str,
    body: &B,
) -> Result<R> {
    let url = format!("{}/{}", api_client.endpoint(), route);
    tracing::debug!(%url, model = api_client.model(), "sending local model request");

    let mut request = http
        .post(&url)
        .header("Content-Type", "application/json")
        .json(body);
    if let Some(key) = api_client.api_key() {
        request = request.bearer_auth(key);
    }

    let response_text = request
        .send()
        .await
        .context("HTTP request failed")?
        .error_for_status()
        .context("Non-success status returned")?
        .text()
        .await
        .context("Reading response body failed")?;

    serde_json::from_str(&response_text).with_context(|| {
        format!(
            "Failed to decode {} response JSON. Raw response: {}",
            route, response_text
        )
    })
}

pub async fn send_caption_request(
    http: &Client,
    api_client: &ModelClient,
    image_b64: String,
) -> Result<String> {
    let body = CaptionRequest {
        model: api_client.model(),
        device: api_client.device().as_str(),
        image_b64,
    };
    let response: CaptionResponse = post_json(http, api_client, "caption", &body).await?;

    response
        .caption
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| anyhow!("Local server did not return a caption."))
}

pub async fn send_sample_request(
    http: &Client,
    api_client: &ModelClient,
    batch_size: usize,
    texts: &[String],
    params: &SamplingParams,
) -> Result<Vec<Latent>> {
    let body = SampleLatentsRequest {
        model: api_client.model(),
        device: api_client.device().as_str(),
        batch_size,
        texts,
        params,
    };
    let response: SampleLatentsResponse =
        post_json(http, api_client, "sample_latents", &body).await?;

    response_to_latents(response, batch_size)
}

pub async fn send_decode_request(
    http: &Client,
    api_client: &ModelClient,
    latent: &Latent,
) -> Result<TriMesh> {
    let body = DecodeMeshRequest {
        model: api_client.model(),
        device: api_client.device().as_str(),
        latent: latent.as_slice(),
    };
    let response: DecodeMeshResponse =
        post_json(http, api_client, "decode_latent_mesh", &body).await?;

    response_to_mesh(response)
}

pub fn response_to_latents(
    response: SampleLatentsResponse,
    batch_size: usize,
) -> Result<Vec<Latent>> {
    if response.latents.len() != batch_size {
        bail!(
            "Sampler returned {} latents for a batch of {}",
            response.latents.len(),
            batch_size
        );
    }
    if response.latents.iter().any(Vec::is_empty) {
        bail!("Sampler returned an empty latent");
    }

    Ok(response.latents.into_iter().map(Latent).collect())
}

pub fn response_to_mesh(response: DecodeMeshResponse) -> Result<TriMesh> {
    let mut mesh = TriMesh::new(response.verts, response.faces);

    if let Some(channels) = response.vertex_channels {
        let colors = channels
            .r
            .iter()
            .zip(&channels.g)
            .zip(&channels.b)
            .map(|((r, g), b)| [*r, *g, *b])
            .collect::<Vec<_>>();
        mesh = mesh.with_colors(colors);
    }

    mesh.validate().context("Decoder returned a malformed mesh")?;
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latent_count_must_match_batch() {
        let response: SampleLatentsResponse =
            serde_json::from_str(r#"{"latents": [[0.1, 0.2], [0.3, 0.4]]}"#).unwrap();
        assert!(response_to_latents(response, 1).is_err());

        let response: SampleLatentsResponse =
            serde_json::from_str(r#"{"latents": [[0.1, 0.2]]}"#).unwrap();
        let latents = response_to_latents(response, 1).unwrap();
        assert_eq!(latents, vec![Latent(vec![0.1, 0.2])]);
    }

    #[test]
    fn empty_latent_is_rejected() {
        let response: SampleLatentsResponse = serde_json::from_str(r#"{"latents": [[]]}"#).unwrap();
        assert!(response_to_latents(response, 1).is_err());
    }

    #[test]
    fn mesh_response_keeps_vertex_colors() {
        let response: DecodeMeshResponse = serde_json::from_str(
            r#"{
                "verts": [[0,0,0],[1,0,0],[0,1,0]],
                "faces": [[0,1,2]],
                "vertex_channels": {"R": [1,0,0], "G": [0,1,0], "B": [0,0,1]}
            }"#,
        )
        .unwrap();
        let mesh = response_to_mesh(response).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.colors.unwrap()[2], [0.0, 0.0, 1.0]);
    }

    #[test]
    fn mesh_response_with_dangling_face_fails() {
        let response: DecodeMeshResponse =
            serde_json::from_str(r#"{"verts": [[0,0,0]], "faces": [[0,1,2]]}"#).unwrap();
        assert!(response_to_mesh(response).is_err());
    }

    #[test]
    fn sample_request_flattens_params() {
        let texts = vec!["a chair".to_string()];
        let params = SamplingParams::shap_e();
        let body = SampleLatentsRequest {
            model: "text300M",
            device: "cpu",
            batch_size: 1,
            texts: &texts,
            params: &params,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["karras_steps"], 32);
        assert_eq!(value["guidance_scale"], 15.0);
        assert_eq!(value["texts"][0], "a chair");
    }
}
