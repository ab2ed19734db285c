use std::path::Path;

use anyhow::anyhow;
use modelapi::TriMesh;
use tokio::fs;

use crate::constants::MESH_BATCH_SIZE;
use crate::context::MeshContext;
use crate::errors::{PipelineError, Result};
use crate::models::MeshArtifacts;

/// Samples latents for one prompt and writes a PLY/OBJ pair per latent.
///
/// Any failure in sampling, decoding, or either write is returned for this key
/// only. Latents and meshes are owned by this call and released before it
/// returns, on success and on error alike.
pub async fn generate_mesh(
    ctx: &MeshContext,
    prompt: &str,
    key: &str,
    output_dir: &Path,
) -> Result<Vec<MeshArtifacts>> {
    let texts = vec![prompt.to_string()];
    let latents = ctx
        .sampler
        .sample_latents(MESH_BATCH_SIZE, &texts, &ctx.params)
        .await?;

    if latents.is_empty() {
        return Err(PipelineError::Model(anyhow!(
            "sampler returned no latents for '{key}'"
        )));
    }

    let mut written = Vec::with_capacity(latents.len());
    for (index, latent) in latents.iter().enumerate() {
        let mesh = ctx.decoder.decode_latent_mesh(latent).await?;
        let artifacts = MeshArtifacts::for_key(output_dir, key, index);
        write_mesh(&mesh, &artifacts).await?;

        tracing::info!(
            key,
            ply = %artifacts.ply.display(),
            obj = %artifacts.obj.display(),
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "saved mesh"
        );
        written.push(artifacts);
    }
    drop(latents);

    Ok(written)
}

async fn write_mesh(mesh: &TriMesh, artifacts: &MeshArtifacts) -> Result<()> {
    let mut ply = Vec::new();
    mesh.write_ply(&mut ply)
        .map_err(|err| PipelineError::io(&artifacts.ply, err))?;
    fs::write(&artifacts.ply, ply)
        .await
        .map_err(|err| PipelineError::io(&artifacts.ply, err))?;

    let mut obj = Vec::new();
    mesh.write_obj(&mut obj)
        .map_err(|err| PipelineError::io(&artifacts.obj, err))?;
    fs::write(&artifacts.obj, obj)
        .await
        .map_err(|err| PipelineError::io(&artifacts.obj, err))
}
