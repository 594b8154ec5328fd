//! Scene configuration.
//!
//! Options load from TOML (`easel.toml` style); every key is optional and
//! missing keys take their defaults. Environment variables can override a
//! loaded file for one-off runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::surface::CompositeOp;

/// Global paint and loop options of one scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Clear the surface before each redraw (skipped while already empty).
    pub auto_clear_canvas: bool,
    /// Opacity applied to every item, `0.0..=1.0`.
    pub global_alpha: f32,
    /// Compositing mode applied to every item.
    pub global_composite_operation: CompositeOp,
    /// Animation tick rate; read when the loop timer starts.
    pub loop_fps: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            auto_clear_canvas: true,
            global_alpha: 1.0,
            global_composite_operation: CompositeOp::SourceOver,
            loop_fps: 30.0,
        }
    }
}

impl SceneOptions {
    /// Loads and validates options from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options: SceneOptions = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        options.validate()?;
        log::debug!("loaded scene options from {}", path.display());
        Ok(options)
    }

    /// Applies `EASEL_*` environment overrides. Unparseable values are
    /// logged and ignored.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("EASEL_AUTO_CLEAR") {
            self.auto_clear_canvas = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("EASEL_GLOBAL_ALPHA") {
            match val.parse::<f32>() {
                Ok(alpha) => self.global_alpha = alpha,
                Err(_) => log::warn!("ignoring EASEL_GLOBAL_ALPHA={val}"),
            }
        }
        if let Ok(val) = std::env::var("EASEL_COMPOSITE") {
            match val.parse::<CompositeOp>() {
                Ok(op) => self.global_composite_operation = op,
                Err(e) => log::warn!("ignoring EASEL_COMPOSITE: {e}"),
            }
        }
        if let Ok(val) = std::env::var("EASEL_LOOP_FPS") {
            match val.parse::<f32>() {
                Ok(fps) => self.loop_fps = fps,
                Err(_) => log::warn!("ignoring EASEL_LOOP_FPS={val}"),
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.global_alpha) {
            return Err(ConfigError::Invalid {
                field: "global_alpha",
                reason: format!("{} is outside 0..=1", self.global_alpha),
            });
        }
        if !self.loop_fps.is_finite() || self.loop_fps <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "loop_fps",
                reason: format!("{} is not a positive frame rate", self.loop_fps),
            });
        }
        Ok(())
    }
}
