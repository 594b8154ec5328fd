//! Error types for the scene layer.
//!
//! Every failure here is local and recoverable: a bad call reports an error and
//! leaves the registry, scheduler and surface exactly as they were.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;

/// Errors reported by the registry, items, scheduler and scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Insert with a key that is already registered.
    #[error("item key `{0}` is already registered")]
    DuplicateKey(String),

    /// Lookup, replace, remove or reorder on an unknown key.
    #[error("no item registered under key `{0}`")]
    NotFound(String),

    /// Item geometry is unusable (non-finite values or negative extents).
    #[error("item `{0}` has invalid geometry")]
    InvalidItem(String),

    /// `stop` was called for an animation that is not scheduled.
    #[error("animation is not scheduled")]
    AnimationNotFound,

    /// Pivot requested for a shape with no points to average.
    #[error("{0} has no points to compute a center from")]
    DegenerateGeometry(&'static str),

    /// Surface provider could not resolve the requested id.
    #[error("no drawing surface with id `{0}`")]
    SurfaceNotFound(String),

    /// Surface dimensions are zero or too large to allocate.
    #[error("cannot create a {width}x{height} drawing surface")]
    InvalidViewport { width: u32, height: u32 },

    /// Item is mutably borrowed elsewhere while the scene tried to draw it.
    #[error("item `{0}` is borrowed while drawing")]
    ItemInUse(String),

    /// First item that failed during a redraw pass.
    #[error("failed to draw item `{key}`")]
    Draw {
        key: String,
        #[source]
        source: Box<SceneError>,
    },

    /// Scene options were rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors produced while loading or validating [`SceneOptions`](crate::config::SceneOptions).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid scene option `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
