//! Shader pipeline error types.

/// Failure building the shader pipeline. Both variants are fatal at startup
/// and carry the compiler/linker diagnostic text.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    /// One stage failed to parse or validate.
    #[error("shader compilation failed ({stage} stage):\n{log}")]
    Compile { stage: &'static str, log: String },

    /// Stages compiled individually but could not be combined into one
    /// pipeline (incompatible uniform-block layouts or device validation).
    #[error("shader program link failed:\n{log}")]
    Link { log: String },
}
