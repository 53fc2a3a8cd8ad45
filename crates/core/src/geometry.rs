//! Renderable shape geometry: positions, texture coordinates, indices.
//!
//! The [`Shape`] trait is the capability set a mesh must provide to the
//! scene pass. It is **object-safe** so shapes can be used as `dyn Shape`
//! for runtime switching between variants without a base-class hierarchy.

/// Capability set for renderable geometry.
///
/// Positions and texture coordinates are parallel sequences; `indices`
/// describes a triangle list into both. Implementations own their data and
/// hand out slices, so a shape can be built once and drawn every frame.
pub trait Shape {
    /// Vertex positions, one `[x, y, z]` per vertex.
    fn positions(&self) -> &[[f32; 3]];

    /// Texture coordinates, one `[u, v]` per vertex, parallel to `positions`.
    fn tex_coords(&self) -> &[[f32; 2]];

    /// Triangle-list indices into the position/coordinate sequences.
    fn indices(&self) -> &[u16];

    /// Number of indices submitted to an indexed draw call.
    fn vertex_count(&self) -> usize {
        self.indices().len()
    }
}

/// Number of faces on a cube.
const CUBE_FACES: usize = 6;
/// Vertices per cube face (each face is its own 4-vertex block so it can
/// carry face-local texture coordinates).
const FACE_VERTICES: usize = 4;

/// An axis-aligned cube with per-face texture coordinates.
///
/// 24 vertices (4 per face x 6 faces) and 36 indices (two triangles per
/// face). Each face is wound as `(0,1,2)` and `(0,2,3)` relative to its own
/// 4-vertex block, with UVs `(0,0),(1,0),(1,1),(0,1)` repeated per face.
#[derive(Debug, Clone)]
pub struct Cube {
    positions: Vec<[f32; 3]>,
    tex_coords: Vec<[f32; 2]>,
    indices: Vec<u16>,
}

impl Cube {
    /// Creates a cube spanning [-1, 1] on every axis.
    pub fn new() -> Self {
        Self::with_half_extent(1.0)
    }

    /// Creates a cube spanning [-e, e] on every axis.
    pub fn with_half_extent(e: f32) -> Self {
        let positions = vec![
            // Front face (+Z)
            [-e, -e, e],
            [e, -e, e],
            [e, e, e],
            [-e, e, e],
            // Back face (-Z)
            [-e, -e, -e],
            [-e, e, -e],
            [e, e, -e],
            [e, -e, -e],
            // Top face (+Y)
            [-e, e, -e],
            [-e, e, e],
            [e, e, e],
            [e, e, -e],
            // Bottom face (-Y)
            [-e, -e, -e],
            [e, -e, -e],
            [e, -e, e],
            [-e, -e, e],
            // Right face (+X)
            [e, -e, -e],
            [e, e, -e],
            [e, e, e],
            [e, -e, e],
            // Left face (-X)
            [-e, -e, -e],
            [-e, -e, e],
            [-e, e, e],
            [-e, e, -e],
        ];

        // Same UV block on every face.
        let tex_coords = (0..CUBE_FACES)
            .flat_map(|_| [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])
            .collect();

        // Two triangles per face: (0,1,2) and (0,2,3) within the face block.
        let indices = (0..CUBE_FACES as u16)
            .flat_map(|face| {
                let base = face * FACE_VERTICES as u16;
                [base, base + 1, base + 2, base, base + 2, base + 3]
            })
            .collect();

        Self {
            positions,
            tex_coords,
            indices,
        }
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::new()
    }
}

impl Shape for Cube {
    fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    fn tex_coords(&self) -> &[[f32; 2]] {
        &self.tex_coords
    }

    fn indices(&self) -> &[u16] {
        &self.indices
    }
}
