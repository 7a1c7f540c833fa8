pub mod color;
pub mod config;
pub mod model;

pub use color::Color;
pub use config::{BackgroundChoice, CardConfig, ConfigError, TextStyle};
pub use model::*;

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, RoundedRect, Size, Vec2};
