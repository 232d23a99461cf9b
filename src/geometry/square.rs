//! Flat unit square in the XY plane.

use glam::Vec3;

use super::{GpuMesh, MeshData};

/// Quad spanning -1..1 in X and Y, facing +Z.
pub struct Square {
    pub center: Vec3,
}

impl Square {
    pub fn new(center: Vec3) -> Self {
        Self { center }
    }

    pub fn mesh(&self) -> MeshData {
        let c = self.center;
        MeshData {
            positions: vec![
                [c.x - 1.0, c.y - 1.0, c.z, 1.0],
                [c.x + 1.0, c.y - 1.0, c.z, 1.0],
                [c.x + 1.0, c.y + 1.0, c.z, 1.0],
                [c.x - 1.0, c.y + 1.0, c.z, 1.0],
            ],
            normals: vec![[0.0, 0.0, 1.0, 0.0]; 4],
            colors: None,
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    pub fn create(&self, device: &wgpu::Device) -> GpuMesh {
        GpuMesh::upload(device, "Square", &self.mesh())
    }
}
