use bytemuck::{Pod, Zeroable};

/// Vertex layout shared by the scene and the player cube.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable, Debug)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

pub struct SubMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

#[derive(Default)]
pub struct Mesh {
    pub submeshes: Vec<SubMesh>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.submeshes.iter().map(|s| s.indices.len() / 3).sum()
    }

    /// Axis-aligned cube centered on the origin, one flat-shaded quad per face.
    pub fn cube(size: f32, color: [f32; 3]) -> Self {
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            // normal, u, v
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ];

        let h = size / 2.0;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (n, u, v) in FACES {
            let base = vertices.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = std::array::from_fn(|i| (n[i] + su * u[i] + sv * v[i]) * h);
                vertices.push(Vertex {
                    position,
                    normal: n,
                    color,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self {
            submeshes: vec![SubMesh { vertices, indices }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_quads_within_extent() {
        let cube = Mesh::cube(0.5, [0.0, 1.0, 0.0]);
        assert_eq!(cube.triangle_count(), 12);
        let sub = &cube.submeshes[0];
        assert_eq!(sub.vertices.len(), 24);
        for v in &sub.vertices {
            assert!(v.position.iter().all(|c| (c.abs() - 0.25).abs() < 1e-6));
        }
    }

    #[test]
    fn cube_faces_wind_counter_clockwise_outward() {
        let cube = Mesh::cube(2.0, [1.0; 3]);
        let sub = &cube.submeshes[0];
        for tri in sub.indices.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|i| glam::Vec3::from(sub.vertices[tri[i] as usize].position));
            let normal = glam::Vec3::from(sub.vertices[tri[0] as usize].normal);
            assert!((b - a).cross(c - a).dot(normal) > 0.0);
        }
    }
}
