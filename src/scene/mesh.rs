//! Geometry of the "T"-shaped prism.
//!
//! Vertices 0..8 sit on the front face (z = +0.1) and 8..16 on the back face
//! (z = -0.1); back vertex `i + 8` mirrors front vertex `i`.

use crate::engine::error::{RenderError, Result};
use crate::engine::graphics::vertex::Vertex;

const FRONT_Z: f32 = 0.1;
const BACK_Z: f32 = -0.1;

pub const T_PRISM_VERTICES: [Vertex; 16] = [
    // Front face: top bar
    Vertex::new(-0.5, 0.5, FRONT_Z),
    Vertex::new(0.5, 0.5, FRONT_Z),
    Vertex::new(-0.5, 0.3, FRONT_Z),
    Vertex::new(0.5, 0.3, FRONT_Z),
    // Front face: stem
    Vertex::new(-0.1, 0.3, FRONT_Z),
    Vertex::new(0.1, 0.3, FRONT_Z),
    Vertex::new(-0.1, -0.5, FRONT_Z),
    Vertex::new(0.1, -0.5, FRONT_Z),
    // Back face: top bar
    Vertex::new(-0.5, 0.5, BACK_Z),
    Vertex::new(0.5, 0.5, BACK_Z),
    Vertex::new(-0.5, 0.3, BACK_Z),
    Vertex::new(0.5, 0.3, BACK_Z),
    // Back face: stem
    Vertex::new(-0.1, 0.3, BACK_Z),
    Vertex::new(0.1, 0.3, BACK_Z),
    Vertex::new(-0.1, -0.5, BACK_Z),
    Vertex::new(0.1, -0.5, BACK_Z),
];

pub const T_PRISM_INDICES: [u32; 36] = [
    // Front face
    0, 1, 2, 1, 2, 3,
    4, 5, 6, 5, 6, 7,
    // Back face
    8, 9, 10, 9, 10, 11,
    12, 13, 14, 13, 14, 15,
    // Left and right ends of the top bar
    0, 2, 8, 10, 2, 8,
    1, 3, 9, 11, 3, 9,
];

/// Front vertices in counter-clockwise order around the outline of the "T".
const FRONT_OUTLINE: [u32; 8] = [0, 2, 4, 6, 7, 5, 3, 1];

/// Which index list to draw.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MeshVariant {
    /// The authored 36-index list: front, back and both ends of the top bar.
    #[default]
    Reference,
    /// Every outline edge gets a side quad, closing the solid.
    Closed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(variant: MeshVariant) -> Self {
        match variant {
            MeshVariant::Reference => Self::t_prism(),
            MeshVariant::Closed => Self::t_prism_closed(),
        }
    }

    pub fn t_prism() -> Self {
        Self {
            vertices: T_PRISM_VERTICES.to_vec(),
            indices: T_PRISM_INDICES.to_vec(),
        }
    }

    /// Same vertices, wound outward, with one side quad per outline edge.
    pub fn t_prism_closed() -> Self {
        let mut indices = vec![
            // Front: bar, stem
            0, 2, 3, 0, 3, 1,
            4, 6, 7, 4, 7, 5,
            // Back: bar, stem
            8, 11, 10, 8, 9, 11,
            12, 15, 14, 12, 13, 15,
        ];
        for (i, &a) in FRONT_OUTLINE.iter().enumerate() {
            let b = FRONT_OUTLINE[(i + 1) % FRONT_OUTLINE.len()];
            indices.extend_from_slice(&[a, b + 8, b, a, a + 8, b + 8]);
        }
        Self {
            vertices: T_PRISM_VERTICES.to_vec(),
            indices,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Checks that the indices form whole triangles over existing vertices.
    pub fn validate(&self) -> Result<()> {
        if self.indices.is_empty() || self.indices.len() % 3 != 0 {
            return Err(RenderError::InvalidMesh(format!(
                "index count {} is not a non-zero multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= self.vertices.len()) {
            return Err(RenderError::InvalidMesh(format!(
                "index {} is out of range for {} vertices",
                index,
                self.vertices.len()
            )));
        }
        Ok(())
    }
}
