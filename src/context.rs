//! Model handles built once per process and shared read-only by every item.

use modelapi::{
    Captioner, LatentSampler, MeshDecoder, SamplingParams, get_captioner, get_latent_sampler,
    get_mesh_decoder,
};

use crate::config::PipelineConfig;
use crate::errors::{PipelineError, Result};

pub struct MeshContext {
    pub sampler: Box<dyn LatentSampler>,
    pub decoder: Box<dyn MeshDecoder>,
    pub params: SamplingParams,
    pub min_artifact_bytes: u64,
}

impl MeshContext {
    pub fn new(sampler: Box<dyn LatentSampler>, decoder: Box<dyn MeshDecoder>) -> Self {
        Self {
            sampler,
            decoder,
            params: SamplingParams::shap_e(),
            min_artifact_bytes: 1,
        }
    }

    pub fn init(config: &PipelineConfig) -> Result<Self> {
        let prior = config.meshing.prior();
        let transmitter = config.meshing.transmitter();
        tracing::info!(
            endpoint = %prior.endpoint,
            prior = %prior.model,
            transmitter = %transmitter.model,
            device = %prior.device,
            "loading mesh models"
        );

        let sampler = get_latent_sampler(prior.to_client())
            .map_err(|err| PipelineError::Config(format!("{err:#}")))?;
        let decoder = get_mesh_decoder(transmitter.to_client())
            .map_err(|err| PipelineError::Config(format!("{err:#}")))?;

        Ok(Self {
            min_artifact_bytes: config.min_artifact_bytes,
            ..Self::new(sampler, decoder)
        })
    }
}

pub struct CaptionContext {
    pub captioner: Box<dyn Captioner>,
}

impl CaptionContext {
    pub fn new(captioner: Box<dyn Captioner>) -> Self {
        Self { captioner }
    }

    pub fn init(config: &PipelineConfig) -> Result<Self> {
        let section = &config.captioning;
        tracing::info!(
            provider = ?section.provider,
            model = %section.model,
            device = %section.device,
            "loading captioning model"
        );
        Ok(Self::new(get_captioner(section.to_client())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelapi::ModelProvider;

    #[test]
    fn default_config_builds_both_contexts() {
        let config = PipelineConfig::default();
        let mesh = MeshContext::init(&config).unwrap();
        assert_eq!(mesh.params, SamplingParams::shap_e());
        assert_eq!(mesh.min_artifact_bytes, 1);
        assert!(CaptionContext::init(&config).is_ok());
    }

    #[test]
    fn hosted_meshing_is_a_config_error() {
        let mut config = PipelineConfig::default();
        config.meshing.provider = ModelProvider::HuggingFace;
        assert!(matches!(
            MeshContext::init(&config),
            Err(PipelineError::Config(_))
        ));
    }
}
