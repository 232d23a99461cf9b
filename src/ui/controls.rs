//! The control panel: every tunable parameter with its published range.

use crate::params::RenderParams;

/// Actions requested through the panel this frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct ControlsResponse {
    /// "Load Scene" was clicked: rebuild all geometry from scratch.
    pub load_scene: bool,
}

/// Draw the panel and apply edits directly to `params`.
pub fn show(ctx: &egui::Context, params: &mut RenderParams) -> ControlsResponse {
    let mut response = ControlsResponse::default();

    egui::Window::new("Controls")
        .default_width(280.0)
        .anchor(egui::Align2::RIGHT_TOP, [-8.0, 8.0])
        .show(ctx, |ui| {
            ui.add(
                egui::Slider::new(&mut params.tessellations, 0..=8)
                    .step_by(1.0)
                    .text("tessellations"),
            );

            ui.separator();
            ui.label("Color");
            channel_sliders(ui, &mut params.color);

            ui.separator();
            ui.add(
                egui::Slider::new(&mut params.time_frequency, 10.0..=500.0)
                    .step_by(10.0)
                    .text("time frequency"),
            );
            ui.add(
                egui::Slider::new(&mut params.noise_frequency, 0.1..=8.0)
                    .step_by(0.1)
                    .text("noise frequency"),
            );
            ui.add(
                egui::Slider::new(&mut params.noise_amplitude, 0.1..=2.0)
                    .step_by(0.1)
                    .text("noise amplitude"),
            );
            ui.add(
                egui::Slider::new(&mut params.noise_persistence, 0.1..=2.0)
                    .step_by(0.1)
                    .text("noise persistence"),
            );
            ui.add(
                egui::Slider::new(&mut params.noise_octaves, 1..=8)
                    .step_by(1.0)
                    .text("noise octaves"),
            );

            ui.separator();
            ui.add(
                egui::Slider::new(&mut params.light_position[0], -10.0..=25.0)
                    .step_by(0.5)
                    .text("light x"),
            );
            ui.add(
                egui::Slider::new(&mut params.light_position[1], 0.1..=10.0)
                    .step_by(0.1)
                    .text("light y"),
            );
            ui.add(
                egui::Slider::new(&mut params.light_position[2], -10.0..=25.0)
                    .step_by(0.5)
                    .text("light z"),
            );
            ui.label("Light color");
            channel_sliders(ui, &mut params.light_color);

            ui.separator();
            ui.add(
                egui::Slider::new(&mut params.roughness, 0.0..=1.0)
                    .step_by(0.01)
                    .text("roughness"),
            );
            ui.add(
                egui::Slider::new(&mut params.metallic, 0.0..=1.0)
                    .step_by(0.01)
                    .text("metallic"),
            );

            ui.separator();
            if ui.button("Load Scene").clicked() {
                response.load_scene = true;
            }
        });

    response
}

fn channel_sliders(ui: &mut egui::Ui, color: &mut [f32; 3]) {
    for (channel, label) in color.iter_mut().zip(["r", "g", "b"]) {
        ui.add(
            egui::Slider::new(channel, 0.0..=255.0)
                .step_by(1.0)
                .text(label),
        );
    }
}
