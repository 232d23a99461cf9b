//! Camera controls, the egui control panel, and the stats overlay.

pub mod camera;
pub mod controls;
pub mod performance;
pub mod system;

pub use camera::OrbitCamera;
pub use performance::PerformanceMetrics;
pub use system::UiSystem;
