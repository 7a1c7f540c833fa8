//! Compositing for Photo Card.
//!
//! `paint_card` and the hit tests are written against the [`Surface`]
//! trait; `PixmapSurface` is the native software implementation and the
//! browser bridge supplies a Canvas2D one.

pub mod export;
pub mod hit;
pub mod paint;
pub mod pixmap;
pub mod surface;

pub use export::{ExportError, export_png, is_blank};
pub use hit::hit_test;
pub use paint::{CardScene, paint_card};
pub use pixmap::PixmapSurface;
pub use surface::{Surface, SurfaceError};
