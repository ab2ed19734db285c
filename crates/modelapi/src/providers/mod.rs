pub mod huggingface;
pub mod local;

use anyhow::{Result, bail};

use crate::traits::{Captioner, LatentSampler, MeshDecoder};
use crate::types::{ModelClient, ModelProvider};

pub use huggingface::HuggingFaceCaptioner;
pub use local::{LocalCaptioner, LocalLatentSampler, LocalMeshDecoder};

pub fn get_captioner(client: ModelClient) -> Box<dyn Captioner> {
    match client.provider() {
        ModelProvider::HuggingFace => Box::new(HuggingFaceCaptioner::new(client)),
        ModelProvider::Local => Box::new(LocalCaptioner::new(client)),
    }
}

pub fn get_latent_sampler(client: ModelClient) -> Result<Box<dyn LatentSampler>> {
    match client.provider() {
        ModelProvider::Local => Ok(Box::new(LocalLatentSampler::new(client))),
        ModelProvider::HuggingFace => {
            bail!("The hosted inference API does not serve a latent sampler; use the local provider")
        }
    }
}

pub fn get_mesh_decoder(client: ModelClient) -> Result<Box<dyn MeshDecoder>> {
    match client.provider() {
        ModelProvider::Local => Ok(Box::new(LocalMeshDecoder::new(client))),
        ModelProvider::HuggingFace => {
            bail!("The hosted inference API does not serve a mesh decoder; use the local provider")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Device;

    #[test]
    fn hosted_provider_cannot_mesh() {
        let client = ModelClient::new(ModelProvider::HuggingFace, "https://x", "m", Device::Cpu);
        assert!(get_latent_sampler(client.clone()).is_err());
        assert!(get_mesh_decoder(client).is_err());
    }

    #[test]
    fn local_provider_serves_everything() {
        let client = ModelClient::new(ModelProvider::Local, "http://127.0.0.1:8000", "m", Device::Cpu);
        assert!(get_latent_sampler(client.clone()).is_ok());
        assert!(get_mesh_decoder(client.clone()).is_ok());
        let _captioner = get_captioner(client);
    }
}
