pub mod mesh;
pub mod providers;
pub mod traits;
pub mod types;
pub mod utils;

pub use mesh::TriMesh;
pub use providers::{get_captioner, get_latent_sampler, get_mesh_decoder};
pub use traits::{Captioner, LatentSampler, MeshDecoder};
pub use types::{Device, Latent, ModelClient, ModelProvider, SamplingParams};
