//! Tunable rendering parameters.
//!
//! One flat record of every value the control panel can touch. The render
//! loop reads it every frame; the panel mutates it in place. Values survive
//! restarts through a RON file next to the executable.

use serde::{Deserialize, Serialize};

/// File the parameters are persisted to between runs.
const PARAMS_FILE: &str = "cubefield.ron";

/// Shared tuning values read by the render loop each frame.
///
/// Color channels are kept on the control panel's 0-255 scale; the renderer
/// performs the conversion it needs when uploading uniforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderParams {
    /// Icosphere subdivision level (0-8).
    pub tessellations: u32,
    /// Base geometry color, 0-255 per channel.
    pub color: [f32; 3],
    /// Divisor applied to the frame counter before noise sampling (10-500).
    pub time_frequency: f32,
    /// Spatial frequency of the displacement noise (0.1-8.0).
    pub noise_frequency: f32,
    /// Displacement amplitude (0.1-2.0).
    pub noise_amplitude: f32,
    /// Per-octave amplitude falloff (0.1-2.0).
    pub noise_persistence: f32,
    /// Number of noise octaves (1-8).
    pub noise_octaves: i32,
    /// World-space light position.
    pub light_position: [f32; 3],
    /// Light color, 0-255 per channel.
    pub light_color: [f32; 3],
    /// Material roughness (0.0-1.0).
    pub roughness: f32,
    /// Material metallic factor (0.0-1.0).
    pub metallic: f32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            tessellations: 5,
            color: [255.0, 0.0, 0.0],
            time_frequency: 100.0,
            noise_frequency: 1.7,
            noise_amplitude: 0.5,
            noise_persistence: 0.5,
            noise_octaves: 2,
            light_position: [5.0, 5.0, 3.0],
            light_color: [255.0, 255.0, 255.0],
            roughness: 0.5,
            metallic: 0.5,
        }
    }
}

impl RenderParams {
    /// Load saved parameters, falling back to defaults on any failure.
    pub fn load() -> Self {
        let path = std::path::Path::new(PARAMS_FILE);
        if !path.exists() {
            log::info!("No saved parameters found, using defaults");
            return Self::default();
        }

        match Self::load_from_file(path) {
            Ok(params) => {
                log::info!("Loaded parameters from {:?}", path);
                params
            }
            Err(e) => {
                log::warn!("Failed to load parameters: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    fn load_from_file(path: &std::path::Path) -> Result<Self, ParamsLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    /// Save parameters to disk.
    pub fn save(&self) -> Result<(), ParamsSaveError> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        std::fs::write(PARAMS_FILE, contents)?;
        Ok(())
    }
}

/// Error type for parameter loading.
#[derive(Debug, thiserror::Error)]
pub enum ParamsLoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Error type for parameter saving.
#[derive(Debug, thiserror::Error)]
pub enum ParamsSaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON serialize error: {0}")]
    Ron(#[from] ron::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_initial_panel_state() {
        let params = RenderParams::default();
        assert_eq!(params.tessellations, 5);
        assert_eq!(params.color, [255.0, 0.0, 0.0]);
        assert_eq!(params.time_frequency, 100.0);
        assert_eq!(params.noise_frequency, 1.7);
        assert_eq!(params.noise_octaves, 2);
        assert_eq!(params.light_position, [5.0, 5.0, 3.0]);
        assert_eq!(params.roughness, 0.5);
        assert_eq!(params.metallic, 0.5);
    }

    #[test]
    fn ron_round_trip_preserves_values() {
        let mut params = RenderParams::default();
        params.noise_frequency = 3.3;
        params.light_color = [10.0, 20.0, 30.0];

        let text = ron::ser::to_string_pretty(&params, ron::ser::PrettyConfig::default())
            .expect("serialize");
        let back: RenderParams = ron::from_str(&text).expect("parse");
        assert_eq!(back, params);
    }
}
