use std::path::{Path, PathBuf};

use modelapi::{Device, ModelClient, ModelProvider};
use serde::Deserialize;

use crate::constants::{
    CAPTIONS_DIR_NAME, CHARTS_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_API_KEY_ENV,
    DEFAULT_CAPTION_MODEL, DEFAULT_HF_ENDPOINT, DEFAULT_LOCAL_ENDPOINT, DEFAULT_PRIOR_MODEL,
    DEFAULT_TRANSMITTER_MODEL, IMAGES_DIR_NAME, OUTPUT_DIR_NAME, PROMPTS_DIR_NAME,
    USER_PROMPTS_DIR_NAME,
};
use crate::errors::{PipelineError, Result};

/// Directory layout rooted at one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base: PathBuf,
}

impl Layout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.base.join(PROMPTS_DIR_NAME)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.base.join(OUTPUT_DIR_NAME)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.base.join(IMAGES_DIR_NAME)
    }

    pub fn user_prompts_dir(&self) -> PathBuf {
        self.base.join(USER_PROMPTS_DIR_NAME)
    }

    pub fn captions_dir(&self) -> PathBuf {
        self.base.join(CAPTIONS_DIR_NAME)
    }

    pub fn charts_dir(&self) -> PathBuf {
        self.base.join(CHARTS_DIR_NAME)
    }

    pub fn config_file(&self) -> PathBuf {
        self.base.join(CONFIG_FILE_NAME)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSection {
    pub provider: ModelProvider,
    pub endpoint: String,
    pub model: String,
    #[serde(default)]
    pub device: Device,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl ModelSection {
    /// Builds the client, pulling the key from the environment when set.
    pub fn to_client(&self) -> ModelClient {
        let client = ModelClient::new(
            self.provider,
            self.endpoint.clone(),
            self.model.clone(),
            self.device,
        );
        match std::env::var(&self.api_key_env) {
            Ok(key) => client.with_api_key(key),
            Err(_) => client,
        }
    }
}

/// Both Shap-E models live on the same server; only the model id differs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshingSection {
    pub provider: ModelProvider,
    pub endpoint: String,
    #[serde(default = "default_prior_model")]
    pub prior_model: String,
    #[serde(default = "default_transmitter_model")]
    pub transmitter_model: String,
    #[serde(default)]
    pub device: Device,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl MeshingSection {
    fn section_for(&self, model: &str) -> ModelSection {
        ModelSection {
            provider: self.provider,
            endpoint: self.endpoint.clone(),
            model: model.to_string(),
            device: self.device,
            api_key_env: self.api_key_env.clone(),
        }
    }

    pub fn prior(&self) -> ModelSection {
        self.section_for(&self.prior_model)
    }

    pub fn transmitter(&self) -> ModelSection {
        self.section_for(&self.transmitter_model)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub captioning: ModelSection,
    pub meshing: MeshingSection,
    /// Minimum size each mesh artifact must have to count as already generated.
    pub min_artifact_bytes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            captioning: ModelSection {
                provider: ModelProvider::HuggingFace,
                endpoint: DEFAULT_HF_ENDPOINT.to_string(),
                model: DEFAULT_CAPTION_MODEL.to_string(),
                device: Device::Cpu,
                api_key_env: default_api_key_env(),
            },
            meshing: MeshingSection {
                provider: ModelProvider::Local,
                endpoint: DEFAULT_LOCAL_ENDPOINT.to_string(),
                prior_model: default_prior_model(),
                transmitter_model: default_transmitter_model(),
                device: Device::Cpu,
                api_key_env: default_api_key_env(),
            },
            min_artifact_bytes: 1,
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| PipelineError::Config(err.to_string()))
    }

    /// Reads `path` if it exists, defaults otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loaded configuration");
                Self::from_toml_str(&contents)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(PipelineError::io(path, err)),
        }
    }
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_prior_model() -> String {
    DEFAULT_PRIOR_MODEL.to_string()
}

fn default_transmitter_model() -> String {
    DEFAULT_TRANSMITTER_MODEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.meshing.prior().model, "text300M");
        assert_eq!(config.meshing.transmitter_model, "transmitter");
        assert_eq!(config.min_artifact_bytes, 1);
    }

    #[test]
    fn sections_override_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            min_artifact_bytes = 64

            [captioning]
            provider = "local"
            endpoint = "http://gpu-box:9000"
            model = "blip-large"
            device = "cuda"

            [meshing]
            provider = "local"
            endpoint = "http://gpu-box:9000"
            transmitter_model = "decoder"
            "#,
        )
        .unwrap();

        assert_eq!(config.captioning.provider, ModelProvider::Local);
        assert_eq!(config.captioning.device, Device::Cuda);
        assert_eq!(config.captioning.api_key_env, "HF_API_TOKEN");
        assert_eq!(config.meshing.prior().model, "text300M");
        assert_eq!(config.meshing.transmitter().model, "decoder");
        assert_eq!(config.meshing.device, Device::Cpu);
        assert_eq!(config.min_artifact_bytes, 64);
    }

    #[test]
    fn sampling_settings_are_not_configurable() {
        let err = PipelineConfig::from_toml_str("karras_steps = 64").unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::load(&dir.path().join("prompt2mesh.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn layout_joins_base() {
        let layout = Layout::new("/data");
        assert_eq!(layout.prompts_dir(), PathBuf::from("/data/prompts"));
        assert_eq!(layout.output_dir(), PathBuf::from("/data/outputs"));
        assert_eq!(layout.user_prompts_dir(), PathBuf::from("/data/user_prompts"));
    }
}
