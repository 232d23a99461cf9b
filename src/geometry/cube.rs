//! Unit cube with per-face normals.

use glam::Vec3;

use super::{GpuMesh, MeshData};

/// Axis-aligned unit cube (side length 2, spanning -1..1) around a center.
pub struct Cube {
    pub center: Vec3,
}

impl Cube {
    pub fn new(center: Vec3) -> Self {
        Self { center }
    }

    /// Build the CPU mesh: 24 vertices (4 per face so normals stay flat)
    /// and 36 indices.
    pub fn mesh(&self) -> MeshData {
        // (normal, four corners in CCW winding seen from outside)
        const FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
            // +X
            (
                [1.0, 0.0, 0.0],
                [
                    [1.0, -1.0, -1.0],
                    [1.0, 1.0, -1.0],
                    [1.0, 1.0, 1.0],
                    [1.0, -1.0, 1.0],
                ],
            ),
            // -X
            (
                [-1.0, 0.0, 0.0],
                [
                    [-1.0, -1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                    [-1.0, 1.0, -1.0],
                    [-1.0, -1.0, -1.0],
                ],
            ),
            // +Y
            (
                [0.0, 1.0, 0.0],
                [
                    [-1.0, 1.0, -1.0],
                    [-1.0, 1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [1.0, 1.0, -1.0],
                ],
            ),
            // -Y
            (
                [0.0, -1.0, 0.0],
                [
                    [-1.0, -1.0, 1.0],
                    [-1.0, -1.0, -1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, -1.0, 1.0],
                ],
            ),
            // +Z
            (
                [0.0, 0.0, 1.0],
                [
                    [-1.0, -1.0, 1.0],
                    [1.0, -1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                ],
            ),
            // -Z
            (
                [0.0, 0.0, -1.0],
                [
                    [1.0, -1.0, -1.0],
                    [-1.0, -1.0, -1.0],
                    [-1.0, 1.0, -1.0],
                    [1.0, 1.0, -1.0],
                ],
            ),
        ];

        let mut mesh = MeshData::default();
        for (normal, corners) in FACES {
            let base = mesh.positions.len() as u32;
            for corner in corners {
                let p = self.center + Vec3::from(corner);
                mesh.positions.push([p.x, p.y, p.z, 1.0]);
                mesh.normals.push([normal[0], normal[1], normal[2], 0.0]);
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// Upload the cube to the GPU.
    pub fn create(&self, device: &wgpu::Device) -> GpuMesh {
        GpuMesh::upload(device, "Cube", &self.mesh())
    }
}
