//! The drawing target trait shared by the native and browser renderers.

use card_core::TextStyle;
use kurbo::{Point, Rect, RoundedRect, Size};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("cannot allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },

    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("font load failed: {0}")]
    Font(String),

    #[error("pixel read-back failed: {0}")]
    ReadBack(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// A fixed-size RGBA drawing target.
///
/// Drawing calls are fire-and-forget: a backend that fails to draw logs
/// and carries on, matching how a canvas context silently skips an
/// undecoded image. Only read-back and encoding report errors.
pub trait Surface {
    /// Decoded image resource the surface can draw.
    type Image;
    /// Result of PNG encoding (bytes natively, a data URL in the browser).
    type Png;

    fn size(&self) -> Size;

    /// Reset every pixel to transparent black.
    fn clear(&mut self);

    /// Draw `image` scaled to fill `dest`.
    fn draw_image(&mut self, image: &Self::Image, dest: Rect);

    /// Draw `image` scaled to fill `dest`, masked by `clip`.
    fn draw_image_clipped(&mut self, image: &Self::Image, dest: Rect, clip: &RoundedRect);

    /// Fill `text` centered on `anchor.x` with its bottom edge on `anchor.y`.
    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle);

    /// Advance width of `text` in `style`.
    fn measure_text(&self, text: &str, style: &TextStyle) -> f64;

    /// Straight or premultiplied RGBA bytes, row-major, 4 bytes per pixel.
    fn read_pixels(&self) -> Result<Vec<u8>, SurfaceError>;

    fn encode_png(&self) -> Result<Self::Png, SurfaceError>;

    /// Whole-surface rectangle.
    fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size())
    }
}
