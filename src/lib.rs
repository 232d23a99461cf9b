//! # cubefield: a procedural cube-field rendering demo
//!
//! Renders a 100x100 grid of cube instances, displaced and shaded by a
//! noise-driven WGSL pipeline, with every tuning parameter live-editable
//! from an on-screen panel.
//!
//! ## Architecture
//!
//! - [`rendering`] — the core: [`rendering::ShaderProgram`] compiles and
//!   links the WGSL stages, resolves named uniform slots by reflection, and
//!   issues draws; [`rendering::FieldRenderer`] turns per-frame state into
//!   the 10,000-draw grid pass.
//! - [`geometry`] — icosphere/cube/square mesh generation and the
//!   [`geometry::Drawable`] GPU-buffer contract.
//! - [`scene`] — [`scene::FieldScene`] owns program, renderer, camera, and
//!   geometry, and runs the per-tick ordering.
//! - [`ui`] — orbit camera, egui control panel, stats overlay.
//! - [`params`] — the shared [`params::RenderParams`] record the panel
//!   mutates and the renderer reads, persisted between runs.
//! - [`app`] — winit/wgpu plumbing and the frame loop.
//!
//! ## Data flow
//!
//! ```text
//! control panel -> RenderParams -> FieldScene::render
//!     -> FieldRenderer (global uniforms once, then per-cell
//!        model/instance uniforms + draw) -> ShaderProgram -> GPU
//! ```
//!
//! Everything runs on the event-loop thread, one tick per redraw; the only
//! GPU binding state carried across draws is the pipeline-activation
//! tracker owned by the renderer.

pub mod app;
pub mod geometry;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod ui;
