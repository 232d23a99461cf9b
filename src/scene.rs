//! The cube-field scene: geometry, shader program, renderer, camera, and
//! the per-frame tick ordering (camera update -> rebuild check -> render).

use glam::Vec3;

use crate::geometry::{Cube, GpuMesh, Icosphere, Square};
use crate::params::RenderParams;
use crate::rendering::{
    FieldRenderer, ShaderError, ShaderProgram, ShaderStage, StageKind, GRID_CELLS,
};
use crate::ui::camera::OrbitCamera;

const VERTEX_SOURCE: &str = include_str!("../shaders/field_vert.wgsl");
const FRAGMENT_SOURCE: &str = include_str!("../shaders/field_frag.wgsl");

/// Everything needed to draw the field, plus the camera looking at it.
pub struct FieldScene {
    pub camera: OrbitCamera,
    program: ShaderProgram,
    renderer: FieldRenderer,
    // Rebuilt by the tessellation slider; kept alongside the field geometry
    // even though only the shared cube is drawn.
    #[allow(dead_code)]
    icosphere: GpuMesh,
    #[allow(dead_code)]
    square: GpuMesh,
    drawables: Vec<GpuMesh>,
    tessellation: RebuildTracker,
    time: i32,
}

impl FieldScene {
    /// Compile and link the shader program, upload the initial geometry,
    /// and place the camera.
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        params: &RenderParams,
    ) -> Result<Self, ShaderError> {
        let vertex = ShaderStage::compile(StageKind::Vertex, VERTEX_SOURCE)?;
        let fragment = ShaderStage::compile(StageKind::Fragment, FRAGMENT_SOURCE)?;
        let program = ShaderProgram::new(device, config.format, vertex, fragment, GRID_CELLS)?;

        let renderer = FieldRenderer::new(device, config);

        let mut camera = OrbitCamera::new(Vec3::new(12.5, 2.5, 12.5), Vec3::ZERO);
        camera.set_aspect_ratio(config.width as f32 / config.height as f32);
        camera.update_projection_matrix();

        let (icosphere, square, drawables) = build_geometry(device, params);
        log::info!("Scene loaded ({} field drawables)", drawables.len());

        Ok(Self {
            camera,
            program,
            renderer,
            icosphere,
            square,
            drawables,
            tessellation: RebuildTracker::new(params.tessellations),
            time: 0,
        })
    }

    /// Rebuild every mesh from scratch (the "Load Scene" action).
    pub fn load_scene(&mut self, device: &wgpu::Device, params: &RenderParams) {
        let (icosphere, square, drawables) = build_geometry(device, params);
        self.icosphere = icosphere;
        self.square = square;
        self.drawables = drawables;
        self.tessellation = RebuildTracker::new(params.tessellations);
        log::info!("Scene reloaded");
    }

    /// Advance one tick: apply camera input and react to parameter edits.
    pub fn update(&mut self, device: &wgpu::Device, dt: f32, params: &RenderParams) {
        self.camera.update(dt);

        if self.tessellation.changed(params.tessellations) {
            self.icosphere =
                Icosphere::new(Vec3::ZERO, 1.0, params.tessellations).create(device);
            log::debug!("Rebuilt icosphere at tessellation {}", params.tessellations);
        }
    }

    /// Draw the frame and advance the animation counter.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        params: &RenderParams,
    ) {
        self.renderer.render(
            device,
            queue,
            view,
            &self.camera,
            &self.program,
            &self.drawables,
            params,
            self.time,
        );
        self.time += 1;
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.renderer.resize(device, width, height);
        if height > 0 {
            self.camera.set_aspect_ratio(width as f32 / height as f32);
            self.camera.update_projection_matrix();
        }
    }
}

fn build_geometry(
    device: &wgpu::Device,
    params: &RenderParams,
) -> (GpuMesh, GpuMesh, Vec<GpuMesh>) {
    let icosphere = Icosphere::new(Vec3::ZERO, 1.0, params.tessellations).create(device);
    let square = Square::new(Vec3::ZERO).create(device);
    // The whole field shares one cube
    let drawables = vec![Cube::new(Vec3::ZERO).create(device)];
    (icosphere, square, drawables)
}

/// Detects edits to a control value, firing exactly once per change.
#[derive(Debug)]
struct RebuildTracker {
    current: u32,
}

impl RebuildTracker {
    fn new(initial: u32) -> Self {
        Self { current: initial }
    }

    /// `true` when `level` differs from the last observed value; subsequent
    /// calls with the same value return `false`.
    fn changed(&mut self, level: u32) -> bool {
        if level != self.current {
            self.current = level;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_fires_once_per_edit() {
        let mut tracker = RebuildTracker::new(5);

        // Unchanged value never fires
        assert!(!tracker.changed(5));
        assert!(!tracker.changed(5));

        // One edit, one rebuild, then quiet until the next edit
        assert!(tracker.changed(3));
        assert!(!tracker.changed(3));
        assert!(!tracker.changed(3));

        assert!(tracker.changed(8));
        assert!(!tracker.changed(8));
    }

    #[test]
    fn rebuild_fires_when_returning_to_an_old_value() {
        let mut tracker = RebuildTracker::new(5);
        assert!(tracker.changed(3));
        assert!(tracker.changed(5));
    }
}
