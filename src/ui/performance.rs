//! Frame-time metrics and the stats overlay.

use std::collections::VecDeque;

use sysinfo::System;

/// Number of frame time samples to keep for averaging.
const FRAME_TIME_SAMPLES: usize = 120;

/// How often to refresh system info (in seconds). Kept coarse because
/// sysinfo refreshes are not cheap.
const SYSTEM_REFRESH_INTERVAL: f32 = 5.0;

/// Rolling frame statistics plus coarse CPU/memory readings.
pub struct PerformanceMetrics {
    frame_times: VecDeque<f32>,
    system: System,
    time_since_refresh: f32,
    cpu_usage: f32,
    memory_used: u64,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        let mut system = System::new_all();
        system.refresh_cpu_all();
        system.refresh_memory();

        Self {
            frame_times: VecDeque::with_capacity(FRAME_TIME_SAMPLES),
            system,
            time_since_refresh: SYSTEM_REFRESH_INTERVAL,
            cpu_usage: 0.0,
            memory_used: 0,
        }
    }

    /// Record one frame's delta time and refresh system stats when due.
    pub fn update(&mut self, dt: f32) {
        if self.frame_times.len() >= FRAME_TIME_SAMPLES {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(dt);

        self.time_since_refresh += dt;
        if self.time_since_refresh >= SYSTEM_REFRESH_INTERVAL {
            self.time_since_refresh = 0.0;
            self.system.refresh_cpu_all();
            self.system.refresh_memory();
            self.cpu_usage = self.system.global_cpu_usage();
            self.memory_used = self.system.used_memory();
        }
    }

    /// Average frame time over the sample window, in milliseconds.
    pub fn average_frame_ms(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.frame_times.iter().sum();
        sum / self.frame_times.len() as f32 * 1000.0
    }

    /// Frames per second derived from the averaged frame time.
    pub fn fps(&self) -> f32 {
        let ms = self.average_frame_ms();
        if ms <= 0.0 {
            0.0
        } else {
            1000.0 / ms
        }
    }

    /// Small always-on overlay in the window corner.
    pub fn show_overlay(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("stats_overlay"))
            .anchor(egui::Align2::LEFT_TOP, [8.0, 8.0])
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(format!(
                        "{:5.1} fps  {:6.2} ms",
                        self.fps(),
                        self.average_frame_ms()
                    ));
                    ui.label(format!(
                        "cpu {:4.1}%  mem {} MB",
                        self.cpu_usage,
                        self.memory_used / (1024 * 1024)
                    ));
                });
            });
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_tracks_the_average_frame_time() {
        let mut metrics = PerformanceMetrics::new();
        for _ in 0..10 {
            metrics.update(0.02);
        }
        assert!((metrics.average_frame_ms() - 20.0).abs() < 1e-3);
        assert!((metrics.fps() - 50.0).abs() < 0.1);
    }

    #[test]
    fn sample_window_is_bounded() {
        let mut metrics = PerformanceMetrics::new();
        for _ in 0..(FRAME_TIME_SAMPLES * 2) {
            metrics.update(0.016);
        }
        assert_eq!(metrics.frame_times.len(), FRAME_TIME_SAMPLES);
    }

    #[test]
    fn empty_metrics_report_zero() {
        let metrics = PerformanceMetrics::new();
        assert_eq!(metrics.fps(), 0.0);
        assert_eq!(metrics.average_frame_ms(), 0.0);
    }
}
