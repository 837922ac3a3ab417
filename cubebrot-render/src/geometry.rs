use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Cube vertex: object-space position and per-face texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CubeVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Fullscreen-quad vertex in clip space.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

pub const CUBE_FACES: usize = 6;
pub const CUBE_VERTEX_COUNT: usize = CUBE_FACES * 4;
pub const CUBE_INDEX_COUNT: usize = CUBE_FACES * 6;

/// Face normal plus the two in-plane axes, chosen so that `u × v = normal`
/// and every face winds counter-clockwise seen from outside.
const FACES: [([f32; 3], [f32; 3], [f32; 3]); CUBE_FACES] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// A cube spanning `[-1, 1]³`. Each face carries its own `[0, 1]²` UVs so
/// the fractal is projected onto every face independently.
pub fn cube_vertices() -> [CubeVertex; CUBE_VERTEX_COUNT] {
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let mut out = [CubeVertex::zeroed(); CUBE_VERTEX_COUNT];
    for (face, (normal, u, v)) in FACES.iter().enumerate() {
        let (normal, u, v) = (Vec3::from(*normal), Vec3::from(*u), Vec3::from(*v));
        for (corner, (su, sv)) in corners.iter().enumerate() {
            let p = normal + u * *su + v * *sv;
            out[face * 4 + corner] = CubeVertex {
                position: p.to_array(),
                uv: [(su + 1.0) * 0.5, (sv + 1.0) * 0.5],
            };
        }
    }
    out
}

/// Two triangles per face.
pub fn cube_indices() -> [u16; CUBE_INDEX_COUNT] {
    let mut out = [0u16; CUBE_INDEX_COUNT];
    for face in 0..CUBE_FACES {
        let base = (face * 4) as u16;
        out[face * 6..face * 6 + 6]
            .copy_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    out
}

/// Two triangles covering clip space, UVs matching the texture's orientation.
pub const FULLSCREEN_QUAD: [QuadVertex; 6] = [
    QuadVertex {
        position: [-1.0, -1.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, -1.0],
        uv: [1.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, -1.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        uv: [0.0, 1.0],
    },
];
