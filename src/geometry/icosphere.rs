//! Icosphere built by recursive icosahedron subdivision.

use std::collections::HashMap;

use glam::Vec3;

use super::{GpuMesh, MeshData};

/// Sphere approximated by subdividing an icosahedron.
///
/// Level 0 is the raw icosahedron (12 vertices, 20 triangles); every level
/// splits each triangle into four, sharing midpoint vertices between
/// neighbors.
pub struct Icosphere {
    pub center: Vec3,
    pub radius: f32,
    pub tessellations: u32,
}

impl Icosphere {
    pub fn new(center: Vec3, radius: f32, tessellations: u32) -> Self {
        Self {
            center,
            radius,
            tessellations,
        }
    }

    /// Build the CPU mesh for the configured subdivision level.
    pub fn mesh(&self) -> MeshData {
        // Icosahedron from three orthogonal golden rectangles.
        let t = (1.0 + 5.0_f32.sqrt()) / 2.0;
        let mut vertices: Vec<Vec3> = vec![
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ]
        .into_iter()
        .map(Vec3::normalize)
        .collect();

        let mut faces: Vec<[u32; 3]> = vec![
            [0, 11, 5],
            [0, 5, 1],
            [0, 1, 7],
            [0, 7, 10],
            [0, 10, 11],
            [1, 5, 9],
            [5, 11, 4],
            [11, 10, 2],
            [10, 7, 6],
            [7, 1, 8],
            [3, 9, 4],
            [3, 4, 2],
            [3, 2, 6],
            [3, 6, 8],
            [3, 8, 9],
            [4, 9, 5],
            [2, 4, 11],
            [6, 2, 10],
            [8, 6, 7],
            [9, 8, 1],
        ];

        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        for _ in 0..self.tessellations {
            let mut next_faces = Vec::with_capacity(faces.len() * 4);
            for [a, b, c] in faces {
                let ab = midpoint(&mut vertices, &mut midpoints, a, b);
                let bc = midpoint(&mut vertices, &mut midpoints, b, c);
                let ca = midpoint(&mut vertices, &mut midpoints, c, a);
                next_faces.push([a, ab, ca]);
                next_faces.push([b, bc, ab]);
                next_faces.push([c, ca, bc]);
                next_faces.push([ab, bc, ca]);
            }
            faces = next_faces;
        }

        let mut mesh = MeshData::default();
        for v in &vertices {
            let p = self.center + *v * self.radius;
            mesh.positions.push([p.x, p.y, p.z, 1.0]);
            mesh.normals.push([v.x, v.y, v.z, 0.0]);
        }
        for [a, b, c] in faces {
            mesh.indices.extend_from_slice(&[a, b, c]);
        }
        mesh
    }

    /// Upload the sphere to the GPU.
    pub fn create(&self, device: &wgpu::Device) -> GpuMesh {
        GpuMesh::upload(device, "Icosphere", &self.mesh())
    }
}

/// Unit-sphere midpoint of two vertices, deduplicated across faces.
fn midpoint(
    vertices: &mut Vec<Vec3>,
    cache: &mut HashMap<(u32, u32), u32>,
    a: u32,
    b: u32,
) -> u32 {
    let key = if a < b { (a, b) } else { (b, a) };
    if let Some(&index) = cache.get(&key) {
        return index;
    }
    let mid = ((vertices[a as usize] + vertices[b as usize]) / 2.0).normalize();
    let index = vertices.len() as u32;
    vertices.push(mid);
    cache.insert(key, index);
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_zero_is_an_icosahedron() {
        let mesh = Icosphere::new(Vec3::ZERO, 1.0, 0).mesh();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 20);
    }

    #[test]
    fn subdivision_counts_follow_closed_form() {
        // V = 10 * 4^n + 2, F = 20 * 4^n for a subdivided icosahedron
        for level in 0..4u32 {
            let mesh = Icosphere::new(Vec3::ZERO, 1.0, level).mesh();
            let pow = 4usize.pow(level);
            assert_eq!(mesh.vertex_count(), 10 * pow + 2, "level {level}");
            assert_eq!(mesh.triangle_count(), 20 * pow, "level {level}");
        }
    }

    #[test]
    fn vertices_sit_on_the_sphere() {
        let center = Vec3::new(1.0, 2.0, 3.0);
        let radius = 2.5;
        let mesh = Icosphere::new(center, radius, 2).mesh();
        for p in &mesh.positions {
            let d = (Vec3::new(p[0], p[1], p[2]) - center).length();
            assert!((d - radius).abs() < 1e-4);
        }
    }

    #[test]
    fn normals_are_unit_length() {
        let mesh = Icosphere::new(Vec3::ZERO, 3.0, 1).mesh();
        for n in &mesh.normals {
            let len = Vec3::new(n[0], n[1], n[2]).length();
            assert!((len - 1.0).abs() < 1e-5);
        }
    }
}
