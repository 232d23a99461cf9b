//! Orbit camera.
//!
//! Mouse input is accumulated as it arrives and applied once per frame in
//! `update`, keeping event handling cheap and the camera math in one place.

use glam::{Mat4, Vec2, Vec3};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Camera orbiting a fixed target: eye/target/up with derived view and
/// projection matrices.
pub struct OrbitCamera {
    pub target: Vec3,
    pub up: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,

    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,

    view: Mat4,
    projection: Mat4,

    // Input state
    is_dragging: bool,
    last_mouse_pos: Option<PhysicalPosition<f64>>,
    accumulated_mouse_delta: Vec2,
    accumulated_scroll: f32,

    pub orbit_sensitivity: f32,
    pub zoom_speed: f32,
}

impl OrbitCamera {
    /// Create a camera at `eye` looking at `target`.
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(0.1);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();

        let mut camera = Self {
            target,
            up: Vec3::Y,
            distance,
            yaw,
            pitch,
            fovy: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            is_dragging: false,
            last_mouse_pos: None,
            accumulated_mouse_delta: Vec2::ZERO,
            accumulated_scroll: 0.0,
            orbit_sensitivity: 0.005,
            zoom_speed: 0.1,
        };
        camera.update_view_matrix();
        camera.update_projection_matrix();
        camera
    }

    /// Current eye position in world space.
    pub fn position(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        let dir = Vec3::new(
            self.yaw.sin() * cos_pitch,
            self.pitch.sin(),
            self.yaw.cos() * cos_pitch,
        );
        self.target + dir * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Recompute the projection matrix from the current aspect ratio.
    pub fn update_projection_matrix(&mut self) {
        self.projection = Mat4::perspective_rh(self.fovy, self.aspect, self.near, self.far);
    }

    fn update_view_matrix(&mut self) {
        self.view = Mat4::look_at_rh(self.position(), self.target, self.up);
    }

    /// Left button starts/stops orbiting.
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.is_dragging = state == ElementState::Pressed;
            if !self.is_dragging {
                self.last_mouse_pos = None;
            }
        }
    }

    pub fn handle_mouse_move(&mut self, position: PhysicalPosition<f64>) {
        if self.is_dragging {
            if let Some(last) = self.last_mouse_pos {
                self.accumulated_mouse_delta.x += (position.x - last.x) as f32;
                self.accumulated_mouse_delta.y += (position.y - last.y) as f32;
            }
            self.last_mouse_pos = Some(position);
        }
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        let amount = match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / 100.0) as f32,
        };
        self.accumulated_scroll += amount;
    }

    /// Apply accumulated input and refresh the view matrix. Call once per
    /// frame.
    pub fn update(&mut self, _dt: f32) {
        if self.accumulated_mouse_delta.length_squared() > 0.0 {
            self.yaw -= self.accumulated_mouse_delta.x * self.orbit_sensitivity;
            // Clamp short of the poles so the up vector stays valid
            self.pitch = (self.pitch + self.accumulated_mouse_delta.y * self.orbit_sensitivity)
                .clamp(-1.5, 1.5);
            self.accumulated_mouse_delta = Vec2::ZERO;
        }

        if self.accumulated_scroll.abs() > 0.001 {
            self.distance =
                (self.distance * (1.0 - self.accumulated_scroll * self.zoom_speed)).max(0.5);
            self.accumulated_scroll = 0.0;
        }

        self.update_view_matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_matches_requested_eye() {
        let eye = Vec3::new(12.5, 2.5, 12.5);
        let camera = OrbitCamera::new(eye, Vec3::ZERO);
        assert!((camera.position() - eye).length() < 1e-3);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let eye = Vec3::new(12.5, 2.5, 12.5);
        let camera = OrbitCamera::new(eye, Vec3::ZERO);
        let mapped = camera.view_matrix().transform_point3(eye);
        assert!(mapped.length() < 1e-3);
    }

    #[test]
    fn update_without_input_keeps_the_eye_fixed() {
        let eye = Vec3::new(12.5, 2.5, 12.5);
        let mut camera = OrbitCamera::new(eye, Vec3::ZERO);
        camera.update(0.016);
        assert!((camera.position() - eye).length() < 1e-3);
    }

    #[test]
    fn aspect_ratio_changes_the_projection() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        camera.set_aspect_ratio(1.0);
        camera.update_projection_matrix();
        let square = camera.projection_matrix();

        camera.set_aspect_ratio(2.0);
        camera.update_projection_matrix();
        let wide = camera.projection_matrix();

        assert!((square.x_axis.x / wide.x_axis.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn drag_orbits_and_scroll_zooms() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let before = camera.position();

        camera.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        camera.handle_mouse_move(PhysicalPosition::new(0.0, 0.0));
        camera.handle_mouse_move(PhysicalPosition::new(40.0, 0.0));
        camera.update(0.016);
        let orbited = camera.position();
        assert!((orbited - before).length() > 1e-3);
        // Orbiting preserves the distance to the target
        assert!((orbited.length() - before.length()).abs() < 1e-3);

        camera.handle_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        camera.update(0.016);
        assert!(camera.position().length() < orbited.length());
    }
}
