use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    HuggingFace,
    Local,
}

/// Device the model weights live on. Only the local server honours it; the
/// hosted API picks its own hardware.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
    Cuda,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Cpu => "cpu",
            Device::Cuda => "cuda",
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug)]
pub struct ModelClient {
    pub(crate) provider: ModelProvider,
    pub(crate) api_key: Option<String>,
    pub(crate) endpoint: String,
    pub(crate) model: String,
    pub(crate) device: Device,
}

impl ModelClient {
    pub fn new(
        provider: ModelProvider,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        device: Device,
    ) -> Self {
        Self {
            provider,
            api_key: None,
            endpoint: endpoint.into(),
            model: model.into(),
            device,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.trim().is_empty() {
            None
        } else {
            Some(key.trim().to_string())
        };
        self
    }

    pub fn provider(&self) -> ModelProvider {
        self.provider
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn device(&self) -> Device {
        self.device
    }
}

/// Hyperparameters handed to the diffusion sampler.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SamplingParams {
    pub guidance_scale: f32,
    pub use_karras: bool,
    pub karras_steps: u32,
    pub sigma_min: f32,
    pub sigma_max: f32,
    pub s_churn: f32,
    pub clip_denoised: bool,
    pub use_fp16: bool,
}

impl SamplingParams {
    /// The published Shap-E text-to-3D settings. Benchmarks compare runs at a
    /// fixed step count, so these are not exposed as configuration.
    pub fn shap_e() -> Self {
        Self {
            guidance_scale: 15.0,
            use_karras: true,
            karras_steps: 32,
            sigma_min: 1e-3,
            sigma_max: 160.0,
            s_churn: 0.0,
            clip_denoised: true,
            use_fp16: false,
        }
    }
}

/// One latent vector produced by the sampler for a single batch slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Latent(pub Vec<f32>);

impl Latent {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}
