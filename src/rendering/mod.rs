//! Shader pipeline and per-frame rendering.

pub mod error;
pub mod program;
pub mod reflect;
pub mod renderer;

pub use error::ShaderError;
pub use program::{PipelineBinding, ShaderProgram, ShaderStage, StageKind, Uniform};
pub use renderer::{FieldRenderer, GRID_CELLS, GRID_SIZE};
