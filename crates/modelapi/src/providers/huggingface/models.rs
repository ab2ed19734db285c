use serde::{Deserialize, Serialize};

/// One entry of the image-to-text inference response.
#[derive(Debug, Serialize, Deserialize)]
pub struct CaptionCandidate {
    pub generated_text: Option<String>,
}

/// Error body returned while a hosted model is still loading or on bad input.
#[derive(Debug, Serialize, Deserialize)]
pub struct HuggingFaceError {
    pub error: String,
    pub estimated_time: Option<f32>,
}
