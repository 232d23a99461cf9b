//! Per-frame translation of application state into draw calls.
//!
//! One pass per frame: clear, push the per-frame uniforms once, then walk
//! the fixed 100x100 grid issuing one draw per cell against the shared
//! drawable. No culling, no instancing — 10,000 naive draws is the designed
//! behavior of this demo.

use glam::{Mat4, Vec3, Vec4};

use crate::geometry::GpuMesh;
use crate::params::RenderParams;
use crate::ui::camera::OrbitCamera;

use super::program::{PipelineBinding, ShaderProgram};

/// Cells along each side of the field.
pub const GRID_SIZE: u32 = 100;

/// Total draw calls per frame.
pub const GRID_CELLS: u32 = GRID_SIZE * GRID_SIZE;

/// Owns the clear color and depth buffer, and runs the per-frame draw loop.
pub struct FieldRenderer {
    clear_color: wgpu::Color,
    #[allow(dead_code)]
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    binding: PipelineBinding,
}

impl FieldRenderer {
    pub fn new(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        let (depth_texture, depth_view) =
            create_depth_texture(device, config.width, config.height);
        Self {
            clear_color: wgpu::Color {
                r: 0.2,
                g: 0.2,
                b: 0.2,
                a: 1.0,
            },
            depth_texture,
            depth_view,
            binding: PipelineBinding::new(),
        }
    }

    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    /// Recreate the depth buffer for a new surface size.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);
        self.depth_texture = depth_texture;
        self.depth_view = depth_view;
    }

    /// Render one frame of the field.
    ///
    /// Pushes the per-frame uniforms once, then one model-matrix upload, one
    /// instance-position upload, and one draw per grid cell, all against
    /// `drawables[0]`.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        camera: &OrbitCamera,
        program: &ShaderProgram,
        drawables: &[GpuMesh],
        params: &RenderParams,
        time: i32,
    ) {
        if drawables.is_empty() {
            return;
        }

        let view_proj = camera.projection_matrix() * camera.view_matrix();
        program.set_view_proj(queue, view_proj);
        program.set_geometry_color(queue, base_color_vec(params.color));
        program.set_time(queue, time);
        program.set_time_frequency(queue, params.time_frequency);
        program.set_noise_frequency(queue, params.noise_frequency);
        program.set_noise_amplitude(queue, params.noise_amplitude);
        program.set_noise_persistence(queue, params.noise_persistence);
        program.set_noise_octaves(queue, params.noise_octaves);
        program.set_light_position(queue, light_position_vec(params.light_position));
        program.set_light_color(queue, light_color_vec(params.light_color));
        program.set_camera_position(queue, camera.position().extend(1.0));
        program.set_roughness(queue, params.roughness);
        program.set_metallic(queue, params.metallic);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Field Render Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Field Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Fresh pass: nothing is bound yet
            self.binding.reset();

            let shared = &drawables[0];
            for (x, z) in grid_cells() {
                let draw_index = z * GRID_SIZE + x;
                program.set_model_matrix(queue, draw_index, cell_model_matrix(x, z));
                program.set_instance_position(queue, draw_index, cell_instance_position(x, z));
                program.draw(&mut pass, &mut self.binding, shared, draw_index);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Field Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Grid cells in draw order: z outer, x inner.
pub fn grid_cells() -> impl Iterator<Item = (u32, u32)> {
    (0..GRID_SIZE).flat_map(|z| (0..GRID_SIZE).map(move |x| (x, z)))
}

/// Per-cell model matrix: uniform 0.1 scale composed with a translation in
/// the scaled local frame, so the world-space grid pitch is 0.1.
pub fn cell_model_matrix(x: u32, z: u32) -> Mat4 {
    Mat4::from_scale(Vec3::splat(0.1))
        * Mat4::from_translation(Vec3::new(x as f32, 0.0, z as f32))
}

/// Per-cell instance position: the cell's world-space center.
pub fn cell_instance_position(x: u32, z: u32) -> Vec4 {
    Vec4::new(x as f32 / 10.0, 0.0, z as f32 / 10.0, 1.0)
}

/// Panel color (0-255 channels) to the normalized vec4 the shader reads.
pub fn base_color_vec(color: [f32; 3]) -> Vec4 {
    Vec4::new(color[0] / 255.0, color[1] / 255.0, color[2] / 255.0, 1.0)
}

/// Panel light color (0-255 channels), doubled, alpha forced to 1.
pub fn light_color_vec(color: [f32; 3]) -> Vec4 {
    Vec4::new(color[0] * 2.0, color[1] * 2.0, color[2] * 2.0, 1.0)
}

/// Light position as a point (w = 1).
pub fn light_position_vec(position: [f32; 3]) -> Vec4 {
    Vec4::new(position[0], position[1], position[2], 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn grid_yields_one_cell_per_draw() {
        let cells: Vec<_> = grid_cells().collect();
        assert_eq!(cells.len(), GRID_CELLS as usize);

        // Every (x, z) pair distinct, every draw index distinct
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len());
        let indices: HashSet<_> = cells.iter().map(|(x, z)| z * GRID_SIZE + x).collect();
        assert_eq!(indices.len(), cells.len());
    }

    #[test]
    fn grid_order_is_z_outer_x_inner() {
        let mut cells = grid_cells();
        assert_eq!(cells.next(), Some((0, 0)));
        assert_eq!(cells.next(), Some((1, 0)));
        let row_end = grid_cells().nth(GRID_SIZE as usize - 1);
        assert_eq!(row_end, Some((GRID_SIZE - 1, 0)));
        let next_row = grid_cells().nth(GRID_SIZE as usize);
        assert_eq!(next_row, Some((0, 1)));
    }

    #[test]
    fn cell_model_matrix_scales_then_translates() {
        let m = cell_model_matrix(3, 7);
        // Translation happens in the scaled frame: world offset is 0.1 * (x, 0, z)
        let translation = m.w_axis;
        assert!((translation.x - 0.3).abs() < 1e-6);
        assert_eq!(translation.y, 0.0);
        assert!((translation.z - 0.7).abs() < 1e-6);

        // Uniform 0.1 scale on the basis vectors
        assert!((m.x_axis.x - 0.1).abs() < 1e-6);
        assert!((m.y_axis.y - 0.1).abs() < 1e-6);
        assert!((m.z_axis.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn instance_position_matches_world_space_cell_center() {
        for (x, z) in [(0u32, 0u32), (3, 7), (99, 99)] {
            let pos = cell_instance_position(x, z);
            let model_translation = cell_model_matrix(x, z).w_axis;
            assert!((pos.x - model_translation.x).abs() < 1e-6);
            assert!((pos.z - model_translation.z).abs() < 1e-6);
            assert_eq!(pos.y, 0.0);
            assert_eq!(pos.w, 1.0);
        }
    }

    #[test]
    fn base_color_normalizes_and_forces_alpha() {
        let v = base_color_vec([255.0, 0.0, 127.5]);
        assert!((v.x - 1.0).abs() < 1e-6);
        assert_eq!(v.y, 0.0);
        assert!((v.z - 0.5).abs() < 1e-6);
        assert_eq!(v.w, 1.0);
    }

    #[test]
    fn light_color_doubles_and_forces_alpha() {
        let v = light_color_vec([10.0, 20.0, 30.0]);
        assert_eq!(v, Vec4::new(20.0, 40.0, 60.0, 1.0));
    }

    #[test]
    fn light_position_is_a_point() {
        assert_eq!(
            light_position_vec([5.0, 5.0, 3.0]),
            Vec4::new(5.0, 5.0, 3.0, 1.0)
        );
    }
}
