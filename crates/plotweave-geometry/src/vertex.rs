//! Vertex format produced by tessellation.

use crate::Color;
use bytemuck::{Pod, Zeroable};

/// Position plus straight (non-premultiplied) RGBA color.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SurfaceVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl SurfaceVertex {
    pub fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color: color.to_array(),
        }
    }
}

/// Output from tessellation: vertices and triangle indices.
#[derive(Debug, Clone)]
pub struct TessellatedMesh<V> {
    pub vertices: Vec<V>,
    pub indices: Vec<u32>,
}

impl<V> Default for TessellatedMesh<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TessellatedMesh<V> {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn from_data(vertices: Vec<V>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append another mesh, rebasing its indices. Draw order is preserved.
    pub fn append(&mut self, other: TessellatedMesh<V>) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}
