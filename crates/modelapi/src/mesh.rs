use std::io::{self, Write};

use anyhow::{Result, bail};

/// Triangle mesh as returned by the mesh decoder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriMesh {
    pub verts: Vec<[f32; 3]>,
    pub faces: Vec<[u32; 3]>,
    /// Per-vertex RGB in 0..=1, parallel to `verts`.
    pub colors: Option<Vec<[f32; 3]>>,
}

impl TriMesh {
    pub fn new(verts: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            verts,
            faces,
            colors: None,
        }
    }

    pub fn with_colors(mut self, colors: Vec<[f32; 3]>) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Rejects meshes whose faces point past the vertex list or whose color
    /// channel does not line up with the vertices.
    pub fn validate(&self) -> Result<()> {
        let count = self.verts.len() as u64;
        if let Some(face) = self
            .faces
            .iter()
            .find(|face| face.iter().any(|&index| u64::from(index) >= count))
        {
            bail!(
                "face {:?} references a vertex outside 0..{}",
                face,
                self.verts.len()
            );
        }

        if let Some(colors) = &self.colors {
            if colors.len() != self.verts.len() {
                bail!(
                    "mesh has {} vertex colors for {} vertices",
                    colors.len(),
                    self.verts.len()
                );
            }
        }

        Ok(())
    }

    /// Binary little-endian PLY.
    pub fn write_ply<W: Write>(&self, mut w: W) -> io::Result<()> {
        writeln!(w, "ply")?;
        writeln!(w, "format binary_little_endian 1.0")?;
        writeln!(w, "element vertex {}", self.verts.len())?;
        writeln!(w, "property float x")?;
        writeln!(w, "property float y")?;
        writeln!(w, "property float z")?;
        if self.colors.is_some() {
            writeln!(w, "property uchar red")?;
            writeln!(w, "property uchar green")?;
            writeln!(w, "property uchar blue")?;
        }
        writeln!(w, "element face {}", self.faces.len())?;
        writeln!(w, "property list uchar int vertex_index")?;
        writeln!(w, "end_header")?;

        for (index, vert) in self.verts.iter().enumerate() {
            for component in vert {
                w.write_all(&component.to_le_bytes())?;
            }
            if let Some(colors) = &self.colors {
                let rgb = colors.get(index).copied().unwrap_or_default();
                w.write_all(&rgb.map(color_to_byte))?;
            }
        }

        for face in &self.faces {
            w.write_all(&[3u8])?;
            for &index in face {
                let index = i32::try_from(index).map_err(|_| {
                    io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("face index {index} does not fit a PLY int"),
                    )
                })?;
                w.write_all(&index.to_le_bytes())?;
            }
        }

        w.flush()
    }

    /// Wavefront OBJ. Colors, when present, trail the vertex position.
    pub fn write_obj<W: Write>(&self, mut w: W) -> io::Result<()> {
        for (index, [x, y, z]) in self.verts.iter().enumerate() {
            match self.colors.as_ref().and_then(|colors| colors.get(index)) {
                Some([r, g, b]) => writeln!(w, "v {x} {y} {z} {r} {g} {b}")?,
                None => writeln!(w, "v {x} {y} {z}")?,
            }
        }

        for [a, b, c] in &self.faces {
            writeln!(w, "f {} {} {}", a + 1, b + 1, c + 1)?;
        }

        w.flush()
    }
}

fn color_to_byte(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}
