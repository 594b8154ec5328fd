//! Easel engine.
//!
//! A retained 2D scene: shape items with their own transform and style are
//! registered under string keys, painted in order onto a [`Surface`], and
//! animated by per-frame callbacks driven from one shared loop timer.
//!
//! ```
//! use easel_engine::config::SceneOptions;
//! use easel_engine::paint::{Color, DrawOptions};
//! use easel_engine::scene::{Item, Scene};
//! use easel_engine::surface::RecordingSurface;
//!
//! let mut scene = Scene::new(RecordingSurface::new(100, 100), SceneOptions::default())?;
//! let mut dot = Item::circle(50.0, 50.0, 10.0);
//! dot.set_draw_options(&DrawOptions::new().fill(Color::BLACK));
//! scene.registry_mut().insert("dot", dot)?;
//! scene.redraw(None)?;
//! assert!(!scene.is_empty());
//! # Ok::<(), easel_engine::SceneError>(())
//! ```

pub mod animation;
pub mod config;
pub mod coords;
pub mod error;
pub mod logging;
pub mod paint;
pub mod scene;
pub mod surface;
pub mod text;
pub mod time;
pub mod transform;

pub use error::{ConfigError, Result, SceneError};
pub use scene::{Item, Scene, SharedItem};
pub use surface::Surface;
