//! Native software surface backed by a tiny-skia pixmap.
//!
//! Photos and backgrounds are decoded with `image` into premultiplied
//! pixmaps. Labels are rasterized with `ab_glyph` once a font has been
//! supplied through [`PixmapSurface::with_font`]; without one, text is only
//! measured (with an average advance) and never drawn.

use crate::surface::{Surface, SurfaceError};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use card_core::TextStyle;
use kurbo::{PathEl, Point, Rect, RoundedRect, Shape, Size};
use std::cell::Cell;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, Mask, Pixmap, PixmapPaint, PremultipliedColorU8,
    Transform,
};

/// Average glyph advance, in em, used to measure text when no font is loaded.
const FALLBACK_ADVANCE_EM: f64 = 0.55;

/// Curve flattening tolerance for clip paths, in pixels.
const PATH_TOLERANCE: f64 = 0.1;

pub struct PixmapSurface {
    pixmap: Pixmap,
    font: Option<FontArc>,
    warned_no_font: Cell<bool>,
}

impl PixmapSurface {
    /// Create a transparent surface.
    ///
    /// Labels stay invisible until a font is attached with
    /// [`with_font`](Self::with_font), so a card holding only labels
    /// exports as blank.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let pixmap = Pixmap::new(width, height).ok_or(SurfaceError::Allocation { width, height })?;
        Ok(Self {
            pixmap,
            font: None,
            warned_no_font: Cell::new(false),
        })
    }

    /// Use the TrueType/OpenType font in `data` for labels.
    ///
    /// The style's weight is not applied; pass the bold face directly.
    pub fn with_font(mut self, data: Vec<u8>) -> Result<Self, SurfaceError> {
        let font = FontArc::try_from_vec(data).map_err(|e| SurfaceError::Font(e.to_string()))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Decode an encoded image (PNG, JPEG, GIF, WebP, BMP) into a pixmap.
    pub fn decode_image(bytes: &[u8]) -> Result<Pixmap, SurfaceError> {
        let rgba = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = rgba.dimensions();
        let mut pixmap =
            Pixmap::new(width, height).ok_or(SurfaceError::Allocation { width, height })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(pixmap)
    }

    fn draw_scaled(&mut self, image: &Pixmap, dest: Rect, mask: Option<&Mask>) {
        let sx = (dest.width() / image.width() as f64) as f32;
        let sy = (dest.height() / image.height() as f64) as f32;
        let transform = Transform::from_row(sx, 0.0, 0.0, sy, dest.x0 as f32, dest.y0 as f32);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, image.as_ref(), &paint, transform, mask);
    }

    fn clip_mask(&self, clip: &RoundedRect) -> Option<Mask> {
        let path = to_skia_path(clip)?;
        let mut mask = Mask::new(self.pixmap.width(), self.pixmap.height())?;
        mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
        Some(mask)
    }

    fn warn_missing_font(&self) {
        if !self.warned_no_font.replace(true) {
            log::warn!("no font loaded: labels are measured approximately and not drawn");
        }
    }
}

impl Surface for PixmapSurface {
    type Image = Pixmap;
    type Png = Vec<u8>;

    fn size(&self) -> Size {
        Size::new(self.pixmap.width() as f64, self.pixmap.height() as f64)
    }

    fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    fn draw_image(&mut self, image: &Pixmap, dest: Rect) {
        self.draw_scaled(image, dest, None);
    }

    fn draw_image_clipped(&mut self, image: &Pixmap, dest: Rect, clip: &RoundedRect) {
        match self.clip_mask(clip) {
            Some(mask) => self.draw_scaled(image, dest, Some(&mask)),
            // Degenerate clip (zero area): nothing is visible.
            None => log::trace!("skipping photo with empty clip {:?}", clip.rect()),
        }
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        let Some(font) = self.font.as_ref() else {
            self.warn_missing_font();
            return;
        };

        let scale = PxScale::from(style.size as f32);
        let scaled = font.as_scaled(scale);
        let width = line_width(font, scale, text);
        // Descent is negative: the baseline sits above the bottom edge.
        let baseline = anchor.y as f32 + scaled.descent();
        let mut caret = anchor.x as f32 - width / 2.0;

        let color = style.fill().to_rgba8();
        let w = self.pixmap.width() as i32;
        let h = self.pixmap.height() as i32;
        let pixels = self.pixmap.pixels_mut();

        let mut prev = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                if px < 0 || py < 0 || px >= w || py >= h {
                    return;
                }
                let idx = (py * w + px) as usize;
                pixels[idx] = blend_over(pixels[idx], color, coverage);
            });
        }
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> f64 {
        match &self.font {
            Some(font) => line_width(font, PxScale::from(style.size as f32), text) as f64,
            None => {
                self.warn_missing_font();
                text.chars().count() as f64 * style.size * FALLBACK_ADVANCE_EM
            }
        }
    }

    fn read_pixels(&self) -> Result<Vec<u8>, SurfaceError> {
        Ok(self.pixmap.data().to_vec())
    }

    fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.pixmap
            .encode_png()
            .map_err(|e| SurfaceError::Encode(e.to_string()))
    }
}

/// Advance width of a single line, kerning included.
fn line_width(font: &FontArc, scale: PxScale, text: &str) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0;
    let mut prev = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    width
}

/// Source-over of a straight RGBA color at `coverage` onto a premultiplied pixel.
fn blend_over(dst: PremultipliedColorU8, [r, g, b, a]: [u8; 4], coverage: f32) -> PremultipliedColorU8 {
    let sa = a as f32 / 255.0 * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - sa;
    let mix = |s: u8, d: u8| (s as f32 * sa + d as f32 * inv).round().min(255.0) as u8;
    PremultipliedColorU8::from_rgba(
        mix(r, dst.red()),
        mix(g, dst.green()),
        mix(b, dst.blue()),
        mix(255, dst.alpha()),
    )
    .unwrap_or(dst)
}

fn to_skia_path(shape: &impl Shape) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in shape.path_elements(PATH_TOLERANCE) {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}
