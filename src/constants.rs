pub const PROMPTS_DIR_NAME: &str = "prompts";
pub const OUTPUT_DIR_NAME: &str = "outputs";
pub const IMAGES_DIR_NAME: &str = "images";
pub const USER_PROMPTS_DIR_NAME: &str = "user_prompts";
pub const CAPTIONS_DIR_NAME: &str = "captions";
pub const CHARTS_DIR_NAME: &str = "charts";

pub const CONFIG_FILE_NAME: &str = "prompt2mesh.toml";
pub const TEXT_EXTENSION: &str = "txt";
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub const PLY_EXTENSION: &str = "ply";
pub const OBJ_EXTENSION: &str = "obj";
pub const MESH_BATCH_SIZE: usize = 1;

pub const DEFAULT_HF_ENDPOINT: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://127.0.0.1:8000";
pub const DEFAULT_CAPTION_MODEL: &str = "Salesforce/blip-image-captioning-base";
pub const DEFAULT_PRIOR_MODEL: &str = "text300M";
pub const DEFAULT_TRANSMITTER_MODEL: &str = "transmitter";
pub const DEFAULT_API_KEY_ENV: &str = "HF_API_TOKEN";
